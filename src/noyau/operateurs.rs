// src/noyau/operateurs.rs
//
// Table des opérateurs / fonctions / constantes.
// Construite une seule fois (OnceLock), jamais modifiée ensuite :
// lectures concurrentes sans verrou.
//
// Convention binaire (IMPORTANT) :
//   apply(op, [a, b]) calcule  b <op> a
//   - a = opérande fourni en premier (dépilé en premier : le plus à droite)
//   - b = opérande fourni en second
//   ex: "5 3 -" => a=3, b=5 => 5 - 3 = 2

use std::sync::OnceLock;

use super::erreur::{Erreur, Result};

/// Précédence sentinelle : “fonction” (toujours parenthésée, hors règles de précédence).
pub const PRECEDENCE_FONCTION: i32 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativite {
    Gauche,
    Droite,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DescripteurOp {
    pub symbole: &'static str,
    pub arite: usize,
    pub precedence: i32,
    /// N’a de sens que pour un opérateur binaire non-fonction.
    pub associativite: Associativite,
    /// N’a de sens que pour l’arité 0.
    pub constante: f64,
}

impl DescripteurOp {
    const fn operateur(symbole: &'static str, precedence: i32, associativite: Associativite) -> Self {
        Self {
            symbole,
            arite: 2,
            precedence,
            associativite,
            constante: 0.0,
        }
    }

    const fn fonction(symbole: &'static str, arite: usize) -> Self {
        Self {
            symbole,
            arite,
            precedence: PRECEDENCE_FONCTION,
            associativite: Associativite::Gauche,
            constante: 0.0,
        }
    }

    const fn constante(symbole: &'static str, valeur: f64) -> Self {
        Self {
            symbole,
            arite: 0,
            precedence: PRECEDENCE_FONCTION,
            associativite: Associativite::Gauche,
            constante: valeur,
        }
    }

    pub fn est_fonction(&self) -> bool {
        self.precedence == PRECEDENCE_FONCTION
    }

    pub fn est_constante(&self) -> bool {
        self.arite == 0
    }
}

#[derive(Debug)]
pub struct TableOperateurs {
    descripteurs: Vec<DescripteurOp>,
}

static TABLE: OnceLock<TableOperateurs> = OnceLock::new();

/// Table globale (initialisée au premier accès).
pub fn table() -> &'static TableOperateurs {
    TABLE.get_or_init(TableOperateurs::standard)
}

impl TableOperateurs {
    fn standard() -> Self {
        use Associativite::*;

        let descripteurs = vec![
            DescripteurOp::operateur("+", 1, Gauche),
            DescripteurOp::operateur("-", 1, Gauche),
            DescripteurOp::operateur("*", 2, Gauche),
            DescripteurOp::operateur("/", 2, Gauche),
            DescripteurOp::operateur("^", 3, Droite),
            DescripteurOp::fonction("max", 2),
            DescripteurOp::fonction("min", 2),
            DescripteurOp::fonction("exp", 1),
            DescripteurOp::fonction("sin", 1),
            DescripteurOp::fonction("cos", 1),
            DescripteurOp::fonction("ln", 1),
            DescripteurOp::fonction("sqrt", 1),
            DescripteurOp::fonction("tan", 1),
            DescripteurOp::fonction("abs", 1),
            DescripteurOp::constante("tau", std::f64::consts::TAU),
        ];

        Self { descripteurs }
    }

    pub fn lookup(&self, symbole: &str) -> Option<&DescripteurOp> {
        self.descripteurs.iter().find(|d| d.symbole == symbole)
    }

    fn descripteur(&self, symbole: &str) -> Result<&DescripteurOp> {
        self.lookup(symbole).ok_or_else(|| Erreur::UnknownOperator {
            symbole: symbole.to_string(),
        })
    }

    pub fn arity(&self, symbole: &str) -> Result<usize> {
        Ok(self.descripteur(symbole)?.arite)
    }

    pub fn est_fonction(&self, symbole: &str) -> bool {
        self.lookup(symbole).is_some_and(DescripteurOp::est_fonction)
    }

    /// Tous les symboles enregistrés (ordre de la table).
    pub fn symboles(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descripteurs.iter().map(|d| d.symbole)
    }

    /// Applique l’opérateur. Les opérandes au-delà de l’arité sont ignorés.
    pub fn apply(&self, symbole: &str, operandes: &[f64]) -> Result<f64> {
        let d = self.descripteur(symbole)?;

        if operandes.len() < d.arite {
            return Err(Erreur::InsufficientOperands {
                symbole: symbole.to_string(),
                attendu: d.arite,
                recu: operandes.len(),
            });
        }

        let non_traite = || Erreur::UnhandledOperator {
            symbole: symbole.to_string(),
            arite: d.arite,
        };

        match d.arite {
            0 => Ok(d.constante),

            1 => {
                let a = operandes[0];
                match d.symbole {
                    "exp" => Ok(a.exp()),
                    "sin" => Ok(a.sin()),
                    "cos" => Ok(a.cos()),
                    "ln" => Ok(a.ln()),
                    "sqrt" => Ok(a.sqrt()),
                    "tan" => Ok(a.tan()),
                    "abs" => Ok(a.abs()),
                    _ => Err(non_traite()),
                }
            }

            2 => {
                // b <op> a : le second fourni est l’opérande de gauche
                let (a, b) = (operandes[0], operandes[1]);
                match d.symbole {
                    "+" => Ok(b + a),
                    "-" => Ok(b - a),
                    "*" => Ok(b * a),
                    "/" => Ok(b / a),
                    "^" => Ok(b.powf(a)),
                    "max" => Ok(b.max(a)),
                    "min" => Ok(b.min(a)),
                    _ => Err(non_traite()),
                }
            }

            _ => Err(non_traite()),
        }
    }
}
