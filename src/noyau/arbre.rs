// src/noyau/arbre.rs
//
// Arbre d’expression en arène.
// - chaque noeud possède la liste ordonnée de ses enfants (ordre = ordre de construction)
// - `parent` n’est qu’un index (non possédant), utilisé seulement pour détacher
// - un noeud a au plus un parent : attacher un noeud déjà rattaché échoue sans rien modifier
// - pas de cycle : un noeud ne descend jamais de lui-même
//
// Construction depuis la RPN : on lit les jetons À L’ENVERS (descente récursive).
// "5 3 -" => lu "-", "3", "5" => noeud "-" avec enfants [3, 5] (sommet de pile d’abord)

use std::iter::Rev;
use std::slice;

use tracing::debug;

use super::erreur::{Erreur, Result};
use super::jetons::Tok;
use super::operateurs::table;

/// Profondeur maximale par défaut (garde-fou récursion).
pub const PROFONDEUR_MAX_DEFAUT: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Noeud {
    jeton: Tok,
    enfants: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Noeud {
    pub fn jeton(&self) -> &Tok {
        &self.jeton
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arbre {
    noeuds: Vec<Noeud>,
    racine: Option<NodeId>,
}

impl Arbre {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un noeud libre (sans parent).
    pub fn ajouter(&mut self, jeton: Tok) -> NodeId {
        let id = NodeId(self.noeuds.len());
        self.noeuds.push(Noeud {
            jeton,
            enfants: Vec::new(),
            parent: None,
        });
        id
    }

    fn verifier(&self, id: NodeId) -> Result<()> {
        if id.0 < self.noeuds.len() {
            Ok(())
        } else {
            Err(Erreur::UnknownNode { noeud: id.0 })
        }
    }

    pub fn noeud(&self, id: NodeId) -> Result<&Noeud> {
        self.noeuds
            .get(id.0)
            .ok_or(Erreur::UnknownNode { noeud: id.0 })
    }

    pub fn enfants(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.noeud(id)?.enfants)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.noeud(id)?.parent)
    }

    pub fn racine(&self) -> Option<NodeId> {
        self.racine
    }

    pub fn set_racine(&mut self, id: NodeId) -> Result<()> {
        self.verifier(id)?;
        self.racine = Some(id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.noeuds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.noeuds.is_empty()
    }

    /// Rattache `enfant` en dernière position sous `parent`.
    pub fn attacher(&mut self, parent: NodeId, enfant: NodeId) -> Result<()> {
        self.verifier(parent)?;
        self.verifier(enfant)?;

        if self.noeuds[enfant.0].parent.is_some() || enfant == parent || self.racine == Some(enfant) {
            return Err(Erreur::AlreadyAttached { noeud: enfant.0 });
        }
        if self.descend_de(parent, enfant) {
            return Err(Erreur::Cycle {
                parent: parent.0,
                enfant: enfant.0,
            });
        }

        self.noeuds[enfant.0].parent = Some(parent);
        self.noeuds[parent.0].enfants.push(enfant);
        Ok(())
    }

    /// `id` est-il `ancetre` ou l’un de ses descendants ? (remontée des parents)
    fn descend_de(&self, id: NodeId, ancetre: NodeId) -> bool {
        let mut courant = Some(id);
        while let Some(c) = courant {
            if c == ancetre {
                return true;
            }
            courant = self.noeuds[c.0].parent;
        }
        false
    }

    /// Détache `enfant` de son parent (sans effet s’il est libre).
    pub fn detacher(&mut self, enfant: NodeId) -> Result<()> {
        self.verifier(enfant)?;

        if let Some(parent) = self.noeuds[enfant.0].parent.take() {
            self.noeuds[parent.0].enfants.retain(|&e| e != enfant);
        }
        Ok(())
    }

    /// Profondeur (racine = 1, arbre vide = 0).
    pub fn profondeur(&self) -> usize {
        fn descendre(a: &Arbre, id: NodeId) -> usize {
            1 + a.noeuds[id.0]
                .enfants
                .iter()
                .map(|&e| descendre(a, e))
                .max()
                .unwrap_or(0)
        }
        self.racine.map_or(0, |r| descendre(self, r))
    }
}

/* ------------------------ Construction depuis la RPN ------------------------ */

struct Constructeur<'a> {
    flux: Rev<slice::Iter<'a, Tok>>,
    arbre: Arbre,
    limite: usize,
}

impl Constructeur<'_> {
    fn construire(&mut self, profondeur: usize) -> Result<NodeId> {
        if profondeur > self.limite {
            return Err(Erreur::TooDeep {
                limite: self.limite,
            });
        }

        let jeton = self
            .flux
            .next()
            .ok_or_else(|| Erreur::malformee("opérande manquante"))?;

        let arite = match jeton {
            Tok::Num { .. } | Tok::Var(_) => 0,
            Tok::Op(s) => table().arity(s)?,
        };

        let id = self.arbre.ajouter(jeton.clone());
        for _ in 0..arite {
            let enfant = self.construire(profondeur + 1)?;
            self.arbre.attacher(id, enfant)?;
        }
        Ok(id)
    }
}

/// Construit l’arbre d’une séquence RPN.
pub fn from_rpn(rpn: &[Tok]) -> Result<Arbre> {
    from_rpn_borne(rpn, PROFONDEUR_MAX_DEFAUT)
}

/// Idem, avec une profondeur maximale explicite.
pub fn from_rpn_borne(rpn: &[Tok], limite: usize) -> Result<Arbre> {
    let mut c = Constructeur {
        flux: rpn.iter().rev(),
        arbre: Arbre::new(),
        limite,
    };

    let racine = c.construire(1)?;

    let restants = c.flux.count();
    if restants > 0 {
        return Err(Erreur::malformee(format!(
            "{restants} jeton(s) en trop après la racine"
        )));
    }

    let mut arbre = c.arbre;
    arbre.set_racine(racine)?;
    debug!(noeuds = arbre.len(), "arbre construit");
    Ok(arbre)
}
