// src/noyau/jetons.rs
//
// Tokenisation en trois temps :
// 1) balayage caractère par caractère -> jetons bruts (genre + texte)
// 2) passes sur la séquence : re-découpage des opérateurs, nombres à plusieurs '.'
// 3) résolution : chaque jeton reçoit sa valeur (f64 / index) une seule fois
//
// Tok n’existe qu’une fois résolu : un Num a toujours sa valeur, un Var son index.

use std::fmt;

use tracing::{debug, trace};

use super::erreur::{Erreur, Result};
use super::operateurs::table;

/// Symboles structurels en plus de la table, en mode infixe.
pub const SYMBOLES_INFIXES: [&str; 3] = ["(", ")", ","];

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    /// `texte` reste le texte d’origine (ex: "tau" pour la constante).
    Num { texte: String, valeur: f64 },
    Var(usize),
    Op(String),
}

impl Tok {
    pub fn symbole(&self) -> Option<&str> {
        match self {
            Tok::Op(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn est_op(&self, symbole: &str) -> bool {
        self.symbole() == Some(symbole)
    }
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Num { texte, .. } => f.write_str(texte),
            Tok::Var(index) => write!(f, "${index}"),
            Tok::Op(symbole) => f.write_str(symbole),
        }
    }
}

/// Forme texte canonique : jetons séparés par un espace, re-lisible dans la même notation.
pub fn format_tokens(tokens: &[Tok]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/* ------------------------ Balayage ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Genre {
    /// Aucun jeton ouvert.
    Invalide,
    Nombre,
    Variable,
    Operateur,
}

#[derive(Clone, Debug, PartialEq)]
struct Brut {
    genre: Genre,
    texte: String,
}

struct Balayeur {
    out: Vec<Brut>,
    genre: Genre,
    texte: String,
}

impl Balayeur {
    fn new() -> Self {
        Self {
            out: Vec::new(),
            genre: Genre::Invalide,
            texte: String::new(),
        }
    }

    fn fermer(&mut self) {
        if self.genre != Genre::Invalide {
            self.out.push(Brut {
                genre: self.genre,
                texte: std::mem::take(&mut self.texte),
            });
        }
        self.genre = Genre::Invalide;
        self.texte.clear();
    }

    fn ouvrir(&mut self, genre: Genre, texte: &str) {
        self.fermer();
        self.genre = genre;
        self.texte.push_str(texte);
    }

    fn etendre(&mut self, c: char) {
        self.texte.push(c);
    }

    fn balayer(mut self, s: &str) -> Vec<Brut> {
        for c in s.chars() {
            match c {
                '$' => self.ouvrir(Genre::Variable, ""),
                c if c.is_whitespace() => self.fermer(),
                c if c.is_ascii_digit() => match self.genre {
                    Genre::Nombre | Genre::Variable => self.etendre(c),
                    _ => self.ouvrir(Genre::Nombre, c.encode_utf8(&mut [0; 4])),
                },
                '.' => match self.genre {
                    Genre::Nombre => self.etendre(c),
                    // ".5" => "0.5"
                    _ => self.ouvrir(Genre::Nombre, "0."),
                },
                c => match self.genre {
                    Genre::Operateur => self.etendre(c),
                    _ => self.ouvrir(Genre::Operateur, c.encode_utf8(&mut [0; 4])),
                },
            }
        }
        self.fermer();
        self.out
    }
}

/* ------------------------ Passes ------------------------ */

/// Re-découpe une suite brute d’opérateurs ("*(" , "sin(") en symboles connus.
/// Un caractère qui ne peut commencer aucun symbole est écarté (tolérance).
fn decouper_operateurs(texte: &str, connus: &[&str]) -> Vec<String> {
    let chars: Vec<char> = texte.chars().collect();
    let mut out = Vec::new();

    let mut debut = 0usize;
    let mut fin = 1usize;

    while debut < chars.len() {
        if fin > chars.len() {
            // préfixe sans fin valide : on abandonne ce départ
            debut += 1;
            fin = debut + 1;
            continue;
        }

        let candidat: String = chars[debut..fin].iter().collect();

        if connus.iter().any(|k| *k == candidat) {
            out.push(candidat);
            debut = fin;
            fin = debut + 1;
        } else if connus.iter().any(|k| k.starts_with(candidat.as_str())) {
            fin += 1;
        } else {
            trace!(ecarte = %chars[debut], "caractère hors vocabulaire");
            debut += 1;
            fin = debut + 1;
        }
    }

    out
}

/// "a.b.c.d" => ["a.b", "0.c", "0.d"]
fn separer_points(texte: &str) -> Vec<String> {
    if texte.matches('.').count() <= 1 {
        return vec![texte.to_string()];
    }

    let segments: Vec<&str> = texte.split('.').collect();
    let mut out = Vec::with_capacity(segments.len() - 1);
    out.push(format!("{}.{}", segments[0], segments[1]));
    for s in &segments[2..] {
        out.push(format!("0.{s}"));
    }
    out
}

fn resoudre(brut: Brut) -> Result<Tok> {
    match brut.genre {
        Genre::Operateur => match table().lookup(&brut.texte) {
            Some(d) if d.est_constante() => Ok(Tok::Num {
                valeur: d.constante,
                texte: brut.texte,
            }),
            _ => Ok(Tok::Op(brut.texte)),
        },
        Genre::Nombre => match brut.texte.parse::<f64>() {
            Ok(valeur) => Ok(Tok::Num {
                texte: brut.texte,
                valeur,
            }),
            Err(source) => Err(Erreur::NumberParse {
                texte: brut.texte,
                source,
            }),
        },
        Genre::Variable => match brut.texte.parse::<usize>() {
            Ok(index) => Ok(Tok::Var(index)),
            Err(source) => Err(Erreur::VariableIndexParse {
                texte: brut.texte,
                source,
            }),
        },
        // fermer() n’émet jamais de jeton Invalide
        Genre::Invalide => Err(Erreur::malformee("jeton sans genre")),
    }
}

/// Tokenise une expression (insensible à la casse).
///
/// `extras` complète les symboles de la table (ex: `SYMBOLES_INFIXES`).
pub fn tokenize(s: &str, extras: &[&str]) -> Result<Vec<Tok>> {
    let s = s.to_lowercase();
    let bruts = Balayeur::new().balayer(&s);

    let mut connus: Vec<&str> = table().symboles().collect();
    connus.extend_from_slice(extras);

    // 1) opérateurs
    let mut decoupes = Vec::with_capacity(bruts.len());
    for b in bruts {
        if b.genre == Genre::Operateur {
            decoupes.extend(
                decouper_operateurs(&b.texte, &connus)
                    .into_iter()
                    .map(|texte| Brut {
                        genre: Genre::Operateur,
                        texte,
                    }),
            );
        } else {
            decoupes.push(b);
        }
    }

    // 2) nombres à plusieurs points
    let mut separes = Vec::with_capacity(decoupes.len());
    for b in decoupes {
        if b.genre == Genre::Nombre {
            separes.extend(separer_points(&b.texte).into_iter().map(|texte| Brut {
                genre: Genre::Nombre,
                texte,
            }));
        } else {
            separes.push(b);
        }
    }

    // 3) valeurs
    let out = separes
        .into_iter()
        .map(resoudre)
        .collect::<Result<Vec<_>>>()?;

    debug!(texte = %s, jetons = out.len(), "tokenisation");
    Ok(out)
}
