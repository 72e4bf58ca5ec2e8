// src/noyau/rpn.rs
//
// Shunting-yard : jetons infixes -> RPN (postfix)
//
// Règles:
// - Num / Var           : sortie directe
// - "("                 : empilé
// - ")"                 : dépile jusqu’à "(" (jetée) ; si une fonction est au sommet, elle sort aussi
// - ","                 : dépile jusqu’à "(" (laissée en place)
// - fonction            : empilée telle quelle (toujours parenthésée)
// - opérateur binaire   : dépile selon précédence / associativité, puis empilé
//
// Arité des appels : on compte les arguments par cadre de parenthèses ;
// "max(1,2,3)" ou "sin(1,2)" sont refusés ici (ArityMismatch).

use tracing::{debug, trace};

use super::erreur::{Erreur, Result};
use super::jetons::Tok;
use super::operateurs::{table, Associativite};

/// Un cadre par "(" ouverte : nombre de virgules vues à ce niveau.
struct Cadre {
    virgules: usize,
}

fn desequilibre(jeton: &str) -> Erreur {
    Erreur::UnbalancedParentheses {
        jeton: jeton.to_string(),
    }
}

/// Convertit une suite de jetons infixes en RPN (notation polonaise inversée).
///
/// Exemple:
///   infixe: 2 + 3 * 4
///   rpn:    2 3 4 * +
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>> {
    let t = table();

    let mut out: Vec<Tok> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Tok> = Vec::new();
    let mut cadres: Vec<Cadre> = Vec::new();

    for tok in tokens {
        let symbole = match tok {
            Tok::Num { .. } | Tok::Var(_) => {
                out.push(tok.clone());
                continue;
            }
            Tok::Op(s) => s.as_str(),
        };

        match symbole {
            "(" => {
                ops.push(tok.clone());
                cadres.push(Cadre { virgules: 0 });
            }

            ")" => {
                // dépile jusqu’à '('
                loop {
                    match ops.pop() {
                        Some(top) if top.est_op("(") => break,
                        Some(top) => out.push(top),
                        None => return Err(desequilibre(")")),
                    }
                }
                let cadre = cadres.pop().ok_or_else(|| desequilibre(")"))?;

                // si une fonction est au sommet, elle sort aussi (avec contrôle d’arité)
                let fonction = ops
                    .last()
                    .and_then(Tok::symbole)
                    .and_then(|s| t.lookup(s))
                    .filter(|d| d.est_fonction());

                if let Some(d) = fonction {
                    let recu = cadre.virgules + 1;
                    if recu != d.arite {
                        return Err(Erreur::ArityMismatch {
                            symbole: d.symbole.to_string(),
                            attendu: d.arite,
                            recu,
                        });
                    }
                    if let Some(f) = ops.pop() {
                        out.push(f);
                    }
                }
            }

            "," => {
                // dépile jusqu’à '(' (qui reste en place)
                loop {
                    match ops.last() {
                        Some(top) if top.est_op("(") => break,
                        Some(_) => {
                            if let Some(top) = ops.pop() {
                                out.push(top);
                            }
                        }
                        None => return Err(desequilibre(",")),
                    }
                }
                if let Some(cadre) = cadres.last_mut() {
                    cadre.virgules += 1;
                }
            }

            _ => {
                let d = t.lookup(symbole).ok_or_else(|| Erreur::UnknownOperator {
                    symbole: symbole.to_string(),
                })?;

                if d.est_fonction() {
                    // fonction : reste sur la pile jusqu’à sa parenthèse fermante
                    ops.push(tok.clone());
                    continue;
                }

                // dépile tant que:
                // - le sommet est un symbole enregistré ('(' bloque)
                // - on ne traverse pas une fonction
                // - la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last().and_then(Tok::symbole).and_then(|s| t.lookup(s)) {
                    if top.est_fonction() {
                        break;
                    }

                    let doit_pop = match d.associativite {
                        Associativite::Gauche => d.precedence <= top.precedence,
                        Associativite::Droite => d.precedence < top.precedence,
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(top) = ops.pop() {
                        trace!(op = %top, "dépile");
                        out.push(top);
                    }
                }

                ops.push(tok.clone());
            }
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if op.est_op("(") {
            return Err(desequilibre("("));
        }
        out.push(op);
    }

    debug!(jetons = tokens.len(), rpn = out.len(), "conversion RPN");
    Ok(out)
}
