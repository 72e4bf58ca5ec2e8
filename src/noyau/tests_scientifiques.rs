//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//!
//! Notes importantes (aligné avec l’état actuel du noyau) :
//! - Opérateur binaire : apply calcule `b op a`, a = valeur dépilée en premier.
//!   En RPN, "5 3 -" vaut donc 5 - 3 = 2, comme l’infixe "5-3" qui s’y convertit.
//!   "3 5 -" vaut -2.
//! - Stress : la pile n’a pas de limite de profondeur, l’arbre si (PROFONDEUR_MAX_DEFAUT).

use std::f64::consts::{E, TAU};
use std::time::{Duration, Instant};

use super::arbre::PROFONDEUR_MAX_DEFAUT;
use super::eval::Strategie;
use super::expression::{evaluate_infix, evaluate_rpn, Expression, InfixExpression, RpnExpression};
use super::Erreur;

fn rpn_ok(expr: &str, vars: Option<&[f64]>) -> f64 {
    let e = RpnExpression::new(expr);
    let p = e
        .evaluate_with(vars, Strategie::Pile)
        .unwrap_or_else(|err| panic!("expr={expr:?} err={err}"));
    let a = e
        .evaluate_with(vars, Strategie::Arbre)
        .unwrap_or_else(|err| panic!("expr={expr:?} err={err}"));
    assert_eq!(p.to_bits(), a.to_bits(), "pile/arbre: expr={expr:?}");
    p
}

fn infixe_ok(expr: &str, vars: Option<&[f64]>) -> f64 {
    evaluate_infix(expr, vars).unwrap_or_else(|err| panic!("expr={expr:?} err={err}"))
}

fn assert_proche(a: f64, b: f64, expr: &str) {
    assert!((a - b).abs() < 1e-12, "expr={expr:?}: {a} vs {b}");
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Contrat des opérandes ------------------------ */

#[test]
fn sci_contrat_operandes_inverses() {
    assert_eq!(rpn_ok("5 3 -", None), 2.0);
    assert_eq!(rpn_ok("3 5 -", None), -2.0);
    assert_eq!(rpn_ok("8 2 /", None), 4.0);
    assert_eq!(rpn_ok("2 3 ^", None), 8.0);
    assert_eq!(rpn_ok("3 5 max", None), 5.0);
    assert_eq!(rpn_ok("3 5 min", None), 3.0);
}

#[test]
fn sci_infixe_et_conversion() {
    assert_eq!(infixe_ok("2+3*4", None), 14.0);
    assert_eq!(infixe_ok("max(3,5)", None), 5.0);
    assert_eq!(infixe_ok("min(3,5)", None), 3.0);

    // arithmétique scolaire sur les opérateurs non commutatifs
    assert_eq!(infixe_ok("5-3", None), 2.0);
    assert_eq!(infixe_ok("10/2", None), 5.0);
    assert_eq!(infixe_ok("2^3", None), 8.0);
    assert_eq!(infixe_ok("2^3^2", None), 512.0);
    assert_eq!(infixe_ok("(1-2)-3", None), -4.0);
    assert_eq!(infixe_ok("1-2-3", None), -4.0);
    assert_eq!(infixe_ok("1-(2-3)", None), 2.0);
    assert_eq!(infixe_ok("$0-$1", Some(&[10.0, 4.0])), 6.0);

    // même valeur que la RPN convertie
    for expr in ["5-3", "8/2", "2^3^2", "(1-2)-3", "1-(2-3)"] {
        let inf = InfixExpression::new(expr);
        let rpn = inf.to_rpn_expression().unwrap();
        assert_eq!(
            inf.evaluate(None).unwrap().to_bits(),
            rpn.evaluate(None).unwrap().to_bits(),
            "expr={expr:?}"
        );
    }
}

/* ------------------------ Invariants numériques ------------------------ */

#[test]
fn sci_constante_tau() {
    assert_eq!(rpn_ok("$0 tau *", Some(&[1.0])), TAU);
    assert_eq!(rpn_ok("TAU", None), TAU);
    assert_eq!(infixe_ok("tau", None), TAU);
}

#[test]
fn sci_identites_trig() {
    // sin² + cos² = 1
    for x in [0.0, 0.3, 1.0, 2.5, -4.0] {
        let v = rpn_ok("$0 sin 2 ^ $0 cos 2 ^ +", Some(&[x]));
        assert_proche(v, 1.0, "sin²+cos²");
    }

    // tan = sin / cos
    for x in [0.1, 0.7, -1.2] {
        let v = rpn_ok("$0 sin $0 cos /", Some(&[x]));
        assert_proche(v, x.tan(), "tan");
        assert_proche(infixe_ok("sin($0)/cos($0)", Some(&[x])), x.tan(), "tan infixe");
    }
}

#[test]
fn sci_exp_ln_sqrt_abs() {
    assert_proche(rpn_ok("1 exp", None), E, "exp(1)");
    assert_proche(rpn_ok("1 exp ln", None), 1.0, "ln(e)");
    assert_eq!(rpn_ok("16 sqrt", None), 4.0);
    assert_eq!(rpn_ok("$0 abs", Some(&[-3.5])), 3.5);
    assert!(rpn_ok("$0 sqrt", Some(&[-1.0])).is_nan());
}

#[test]
fn sci_nombres_a_plusieurs_points() {
    // "1.2.3" => 1.2 et 0.3 ; "+" les additionne
    assert_proche(rpn_ok("1.2.3 +", None), 1.5, "1.2.3 +");
    assert_eq!(rpn_ok(".5 .5 +", None), 1.0);
}

#[test]
fn sci_variables() {
    assert_eq!(
        evaluate_rpn("$0", None),
        Err(Erreur::MissingVariables { index: 0 })
    );
    assert_eq!(
        evaluate_rpn("$1", Some(&[1.0])),
        Err(Erreur::VariableIndexOutOfRange {
            index: 1,
            disponibles: 1
        })
    );
    assert_eq!(rpn_ok("$2 $0 +", Some(&[1.0, 100.0, 2.0])), 3.0);
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_somme_lineaire() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // "1 1 + 1 + ..." : arbre aussi profond que la somme est longue
    let n = PROFONDEUR_MAX_DEFAUT / 2;
    let mut expr = "1".to_string();
    for _ in 0..n {
        expr.push_str(" 1 +");
    }
    budget(t0, max);

    assert_eq!(rpn_ok(&expr, None), (n + 1) as f64);
    budget(t0, max);
}

#[test]
fn sci_stress_profondeur_bornee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let n = PROFONDEUR_MAX_DEFAUT * 2;
    let mut expr = "1".to_string();
    for _ in 0..n {
        expr.push_str(" abs");
    }
    budget(t0, max);

    let e = RpnExpression::new(expr);
    assert_eq!(
        e.evaluate(None),
        Err(Erreur::TooDeep {
            limite: PROFONDEUR_MAX_DEFAUT
        })
    );
    // la pile, elle, n’est pas bornée
    assert_eq!(e.evaluate_with(None, Strategie::Pile).unwrap(), 1.0);
    budget(t0, max);
}

#[test]
fn sci_espaces_et_majuscules() {
    assert_eq!(infixe_ok("  MAX ( 3 , 5 ) ", None), 5.0);
    assert_eq!(rpn_ok("  3   5  MAX ", None), 5.0);
}
