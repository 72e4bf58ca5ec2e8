// src/noyau/expression.rs
//
// Façade : deux genres d’expressions (RPN native, infixe native).
//
// Pipeline paresseux, calculé une seule fois puis mis en cache :
//   texte -> jetons -> [RPN si infixe] -> arbre
//
// Chaque champ du cache est un OnceLock : une expression peut être partagée entre
// threads avant sa première évaluation, l’initialisation reste unique.
// Les erreurs sont mises en cache aussi (même texte => même erreur).

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

use super::arbre::{from_rpn_borne, Arbre, PROFONDEUR_MAX_DEFAUT};
use super::erreur::{Erreur, Result};
use super::eval::{eval_arbre, eval_pile, Strategie};
use super::jetons::{format_tokens, tokenize, Tok, SYMBOLES_INFIXES};
use super::rpn::to_rpn;

#[derive(Debug, Default)]
struct Cache {
    jetons: OnceLock<Result<Vec<Tok>>>,
    rpn: OnceLock<Result<Vec<Tok>>>,
    arbre: OnceLock<Result<Arbre>>,
    nb_variables: OnceLock<usize>,
}

fn rejouer<T>(r: &Result<T>) -> Result<&T> {
    r.as_ref().map_err(Erreur::clone)
}

/// Comportement commun aux deux notations.
pub trait Expression {
    /// Texte tel que fourni.
    fn texte(&self) -> &str;

    /// Jetons dans la notation d’origine.
    fn tokens(&self) -> Result<&[Tok]>;

    /// Séquence RPN (identique à `tokens()` pour une expression RPN).
    fn rpn(&self) -> Result<&[Tok]>;

    /// Arbre d’expression.
    fn tree(&self) -> Result<&Arbre>;

    /// Plus grand index de variable référencé + 1 (0 sans variable).
    fn variable_count(&self) -> Result<usize>;

    /// Forme texte canonique, re-lisible dans la même notation.
    fn canonical(&self) -> Result<String> {
        Ok(format_tokens(self.tokens()?))
    }

    /// Évalue via l’arbre.
    fn evaluate(&self, variables: Option<&[f64]>) -> Result<f64> {
        self.evaluate_with(variables, Strategie::default())
    }

    fn evaluate_with(&self, variables: Option<&[f64]>, strategie: Strategie) -> Result<f64> {
        match strategie {
            Strategie::Pile => eval_pile(self.rpn()?, variables),
            Strategie::Arbre => eval_arbre(self.tree()?, variables),
        }
    }
}

fn compter_variables(rpn: &[Tok]) -> usize {
    rpn.iter()
        .filter_map(|t| match t {
            Tok::Var(i) => Some(i + 1),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

/* ------------------------ RPN ------------------------ */

/// Expression en notation polonaise inversée : `2 3 $0 sin * +`.
#[derive(Debug)]
pub struct RpnExpression {
    texte: String,
    profondeur_max: usize,
    cache: Cache,
}

impl RpnExpression {
    pub fn new(texte: impl Into<String>) -> Self {
        Self {
            texte: texte.into(),
            profondeur_max: PROFONDEUR_MAX_DEFAUT,
            cache: Cache::default(),
        }
    }

    /// Profondeur maximale de l’arbre (garde-fou).
    pub fn with_profondeur_max(mut self, limite: usize) -> Self {
        self.profondeur_max = limite;
        self
    }
}

impl Expression for RpnExpression {
    fn texte(&self) -> &str {
        &self.texte
    }

    fn tokens(&self) -> Result<&[Tok]> {
        let r = self.cache.jetons.get_or_init(|| {
            debug!(texte = %self.texte, "cache RPN: jetons");
            tokenize(&self.texte, &[])
        });
        rejouer(r).map(Vec::as_slice)
    }

    fn rpn(&self) -> Result<&[Tok]> {
        self.tokens()
    }

    fn tree(&self) -> Result<&Arbre> {
        let r = self
            .cache
            .arbre
            .get_or_init(|| from_rpn_borne(self.rpn()?, self.profondeur_max));
        rejouer(r)
    }

    fn variable_count(&self) -> Result<usize> {
        let rpn = self.rpn()?;
        Ok(*self.cache.nb_variables.get_or_init(|| compter_variables(rpn)))
    }
}

/* ------------------------ Infixe ------------------------ */

/// Expression infixe : `2+3*sin($0)`.
#[derive(Debug)]
pub struct InfixExpression {
    texte: String,
    profondeur_max: usize,
    cache: Cache,
}

impl InfixExpression {
    pub fn new(texte: impl Into<String>) -> Self {
        Self {
            texte: texte.into(),
            profondeur_max: PROFONDEUR_MAX_DEFAUT,
            cache: Cache::default(),
        }
    }

    pub fn with_profondeur_max(mut self, limite: usize) -> Self {
        self.profondeur_max = limite;
        self
    }

    /// Expression RPN équivalente (texte canonique de la conversion).
    pub fn to_rpn_expression(&self) -> Result<RpnExpression> {
        Ok(RpnExpression::new(format_tokens(self.rpn()?)).with_profondeur_max(self.profondeur_max))
    }
}

impl Expression for InfixExpression {
    fn texte(&self) -> &str {
        &self.texte
    }

    fn tokens(&self) -> Result<&[Tok]> {
        let r = self.cache.jetons.get_or_init(|| {
            debug!(texte = %self.texte, "cache infixe: jetons");
            tokenize(&self.texte, &SYMBOLES_INFIXES)
        });
        rejouer(r).map(Vec::as_slice)
    }

    fn rpn(&self) -> Result<&[Tok]> {
        let r = self.cache.rpn.get_or_init(|| to_rpn(self.tokens()?));
        rejouer(r).map(Vec::as_slice)
    }

    fn tree(&self) -> Result<&Arbre> {
        let r = self
            .cache
            .arbre
            .get_or_init(|| from_rpn_borne(self.rpn()?, self.profondeur_max));
        rejouer(r)
    }

    fn variable_count(&self) -> Result<usize> {
        let rpn = self.rpn()?;
        Ok(*self.cache.nb_variables.get_or_init(|| compter_variables(rpn)))
    }
}

/// Forme canonique si la tokenisation réussit, texte brut sinon.
fn afficher(e: &impl Expression, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match e.tokens() {
        Ok(jetons) => f.write_str(&format_tokens(jetons)),
        Err(_) => f.write_str(e.texte()),
    }
}

impl fmt::Display for RpnExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        afficher(self, f)
    }
}

impl fmt::Display for InfixExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        afficher(self, f)
    }
}

/* ------------------------ Raccourcis ------------------------ */

/// Évalue une expression RPN en une fois.
pub fn evaluate_rpn(texte: &str, variables: Option<&[f64]>) -> Result<f64> {
    RpnExpression::new(texte).evaluate(variables)
}

/// Évalue une expression infixe en une fois.
pub fn evaluate_infix(texte: &str, variables: Option<&[f64]>) -> Result<f64> {
    InfixExpression::new(texte).evaluate(variables)
}
