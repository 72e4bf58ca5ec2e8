//! Calculatrice RPN — évaluation d’expressions scalaires, en notation infixe
//! (`2+3*sin($0)`) ou polonaise inversée (`2 3 $0 sin * +`).
//!
//! ```
//! use calculatrice_rpn::{Expression, InfixExpression, RpnExpression};
//!
//! let rpn = RpnExpression::new("5 3 -");
//! assert_eq!(rpn.evaluate(None).unwrap(), 2.0);
//!
//! let inf = InfixExpression::new("2^3^2");
//! assert_eq!(inf.evaluate(None).unwrap(), 512.0);
//!
//! let inf = InfixExpression::new("max(3, $0)");
//! assert_eq!(inf.evaluate(Some(&[7.0])).unwrap(), 7.0);
//! ```

pub mod noyau;

pub use noyau::arbre::{Arbre, NodeId};
pub use noyau::jetons::{format_tokens, tokenize, Tok, SYMBOLES_INFIXES};
pub use noyau::operateurs::{table, Associativite, DescripteurOp, TableOperateurs};
pub use noyau::rpn::to_rpn;
pub use noyau::{
    evaluate_infix, evaluate_rpn, Erreur, Expression, InfixExpression, Result, RpnExpression,
    Strategie,
};
