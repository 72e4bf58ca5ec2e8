//! Noyau — évaluation
//!
//! Deux chemins, résultats identiques au bit près :
//! - pile : balayage de la RPN avec une pile de valeurs
//! - arbre : descente récursive sur l’arbre construit par `arbre::from_rpn`
//!
//! Appariement des opérandes (voir operateurs.rs) :
//! - pile : les `arite` valeurs du sommet, dans l’ordre de dépilement -> (a, b)
//! - arbre : enfants dans l’ordre de construction, tronqués à l’arité -> (a, b)
//!
//! "5 3 -" : a = 3 (sommet), b = 5 => 2, comme l’infixe "5-3".
//!
//! Tout échec interrompt l’évaluation (pas de résultat partiel).

use super::arbre::{Arbre, NodeId};
use super::erreur::{Erreur, Result};
use super::jetons::Tok;
use super::operateurs::table;

/// Choix du chemin d’évaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategie {
    Pile,
    #[default]
    Arbre,
}

/// Résout `$index` dans les variables fournies.
pub(crate) fn resoudre_variable(index: usize, variables: Option<&[f64]>) -> Result<f64> {
    let vars = variables.ok_or(Erreur::MissingVariables { index })?;
    vars.get(index)
        .copied()
        .ok_or(Erreur::VariableIndexOutOfRange {
            index,
            disponibles: vars.len(),
        })
}

/// Évalue une séquence RPN avec une pile de valeurs.
pub fn eval_pile(rpn: &[Tok], variables: Option<&[f64]>) -> Result<f64> {
    let t = table();
    let mut pile: Vec<f64> = Vec::with_capacity(rpn.len());

    for tok in rpn {
        match tok {
            Tok::Num { valeur, .. } => pile.push(*valeur),
            Tok::Var(index) => pile.push(resoudre_variable(*index, variables)?),
            Tok::Op(symbole) => {
                let arite = t.arity(symbole)?;
                if pile.len() < arite {
                    return Err(Erreur::InsufficientOperands {
                        symbole: symbole.clone(),
                        attendu: arite,
                        recu: pile.len(),
                    });
                }
                let debut = pile.len() - arite;
                // sommet d’abord
                let operandes: Vec<f64> = pile.drain(debut..).rev().collect();
                pile.push(t.apply(symbole, &operandes)?);
            }
        }
    }

    match pile.as_slice() {
        [v] => Ok(*v),
        [] => Err(Erreur::malformee("aucune valeur")),
        reste => Err(Erreur::malformee(format!(
            "{} valeurs restantes sur la pile",
            reste.len()
        ))),
    }
}

/// Évalue un arbre (récursif).
pub fn eval_arbre(arbre: &Arbre, variables: Option<&[f64]>) -> Result<f64> {
    let racine = arbre
        .racine()
        .ok_or_else(|| Erreur::malformee("arbre vide"))?;
    eval_noeud(arbre, racine, variables)
}

fn eval_noeud(arbre: &Arbre, id: NodeId, variables: Option<&[f64]>) -> Result<f64> {
    let noeud = arbre.noeud(id)?;

    match noeud.jeton() {
        Tok::Num { valeur, .. } => Ok(*valeur),
        Tok::Var(index) => resoudre_variable(*index, variables),
        Tok::Op(symbole) => {
            let t = table();
            let arite = t.arity(symbole)?;

            // premier enfant construit = sommet de pile
            let operandes = arbre
                .enfants(id)?
                .iter()
                .take(arite)
                .map(|&e| eval_noeud(arbre, e, variables))
                .collect::<Result<Vec<f64>>>()?;

            t.apply(symbole, &operandes)
        }
    }
}
