//! Noyau RPN / infixe
//!
//! Organisation interne :
//! - operateurs.rs : table figée des opérateurs / fonctions / constantes + apply
//! - jetons.rs     : tokenisation (balayage, re-découpage, résolution des valeurs)
//! - rpn.rs        : shunting-yard (infixe -> RPN)
//! - arbre.rs      : arbre en arène + construction depuis la RPN
//! - eval.rs       : évaluation par pile ou par arbre (résultats identiques)
//! - expression.rs : façade (RpnExpression, InfixExpression) avec cache paresseux
//! - erreur.rs     : erreurs typées

pub mod arbre;
pub mod erreur;
pub mod eval;
pub mod expression;
pub mod jetons;
pub mod operateurs;
pub mod rpn;

#[cfg(test)]
mod tests_scientifiques;


// API publique minimale
pub use erreur::{Erreur, Result};
pub use eval::Strategie;
pub use expression::{evaluate_infix, evaluate_rpn, Expression, InfixExpression, RpnExpression};
