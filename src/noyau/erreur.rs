// src/noyau/erreur.rs
//
// Erreurs du noyau.
// Toutes sont “fail-fast” : aucune n’est récupérée localement, aucune valeur par défaut.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Résultat du noyau.
pub type Result<T> = std::result::Result<T, Erreur>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Erreur {
    #[error("opérateur inconnu: '{symbole}'")]
    UnknownOperator { symbole: String },

    #[error("opérandes insuffisantes pour '{symbole}': {attendu} attendue(s), {recu} disponible(s)")]
    InsufficientOperands {
        symbole: String,
        attendu: usize,
        recu: usize,
    },

    #[error("appel de '{symbole}' avec {recu} argument(s), {attendu} attendu(s)")]
    ArityMismatch {
        symbole: String,
        attendu: usize,
        recu: usize,
    },

    /// Invariant interne : l’arité est connue mais aucun calcul ne correspond.
    #[error("opérateur '{symbole}' (arité {arite}) non traité")]
    UnhandledOperator { symbole: String, arite: usize },

    #[error("parenthèses déséquilibrées autour de '{jeton}'")]
    UnbalancedParentheses { jeton: String },

    #[error("expression invalide: {detail}")]
    MalformedExpression { detail: String },

    #[error("nombre invalide: '{texte}'")]
    NumberParse {
        texte: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("index de variable invalide: '${texte}'")]
    VariableIndexParse {
        texte: String,
        #[source]
        source: ParseIntError,
    },

    #[error("variable ${index} référencée mais aucune variable fournie")]
    MissingVariables { index: usize },

    #[error("variable ${index} hors limites: {disponibles} variable(s) fournie(s)")]
    VariableIndexOutOfRange { index: usize, disponibles: usize },

    #[error("le noeud {noeud} a déjà un parent")]
    AlreadyAttached { noeud: usize },

    #[error("rattacher {enfant} sous {parent} créerait un cycle")]
    Cycle { parent: usize, enfant: usize },

    #[error("noeud {noeud} inexistant dans cet arbre")]
    UnknownNode { noeud: usize },

    #[error("arbre trop profond (limite {limite})")]
    TooDeep { limite: usize },
}

impl Erreur {
    pub(crate) fn malformee(detail: impl Into<String>) -> Self {
        Erreur::MalformedExpression {
            detail: detail.into(),
        }
    }
}
