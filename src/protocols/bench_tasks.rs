use std::fs;
use std::path::Path;

use log::debug;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::{Value, ser::PrettyFormatter};

use crate::elliptic::{
    curve::Curve,
    projective_point::Point,
    torsion_basis::{Orientation, TorsionBasis, sample_torsion_basis},
};
use crate::error::{IsogenyError, Result};
use crate::fields::fp2::Fp2;

use super::parameters::PublicParameters;

const BENCH_TASKS_KEY: &str = "bench_tasks";

#[derive(Serialize)]
struct BenchTaskDocument<'a> {
    bench_tasks: &'a [MsidhBenchTask],
}

/// A stored benchmark instance: the starting curve y^2 = x^3 + ax^2 + x and
/// a basis P, Q of its full (p + 1)-torsion together with R = P - Q. Field
/// elements are kept in their "b*i + a" text form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsidhBenchTask {
    pub t: usize,
    pub a: String,
    pub xP: String,
    pub yP: String,
    pub xQ: String,
    pub yQ: String,
    pub xR: String,
    pub yR: String,
}

fn affine(P: &Point<Fp2>, name: &str) -> Result<(String, String)> {
    P.to_xy()
        .map(|(x, y)| (x.to_string(), y.to_string()))
        .ok_or_else(|| IsogenyError::BenchFormat(format!("point {name} is at infinity")))
}

impl MsidhBenchTask {
    pub fn new(t: usize, E: &Curve<Fp2>, P: &Point<Fp2>, Q: &Point<Fp2>) -> Result<Self> {
        let R = E.sub(P, Q);
        let (xP, yP) = affine(P, "P")?;
        let (xQ, yQ) = affine(Q, "Q")?;
        let (xR, yR) = affine(&R, "R")?;
        Ok(Self {
            t,
            a: E.A.to_string(),
            xP,
            yP,
            xQ,
            yQ,
            xR,
            yR,
        })
    }

    /// Sample a fresh task for the given parameters: E0 and a basis of its
    /// full torsion with neither point above (0, 0).
    pub fn generate<R: CryptoRng + RngCore>(params: &PublicParameters, rng: &mut R) -> Result<Self> {
        let E0 = params.starting_curve()?;
        let n = params.full_order()?;
        let basis = sample_torsion_basis(&E0, &n, Orientation::Neither, rng)?;
        Self::new(params.t, &E0, &basis.P, &basis.Q)
    }

    /// Parse the task over GF(p^2) for the given parameters, checking that
    /// the points lie on the curve and that R = P - Q.
    pub fn decode(&self, params: &PublicParameters) -> Result<(Curve<Fp2>, TorsionBasis<Fp2>)> {
        if self.t != params.t {
            return Err(IsogenyError::BenchFormat(format!(
                "task built for t = {}, parameters have t = {}",
                self.t, params.t
            )));
        }
        let field = params.field()?;
        let E = Curve::new(&field.parse(&self.a)?)?;
        let point = |x: &str, y: &str| -> Result<Point<Fp2>> {
            Ok(Point::new_xy(&field.parse(x)?, &field.parse(y)?))
        };
        let P = point(&self.xP, &self.yP)?;
        let Q = point(&self.xQ, &self.yQ)?;
        let R = point(&self.xR, &self.yR)?;

        if !E.is_on_curve(&P) || !E.is_on_curve(&Q) || !E.is_on_curve(&R) {
            return Err(IsogenyError::BenchFormat(
                "task points do not lie on the curve".to_string(),
            ));
        }
        if E.sub(&P, &Q) != R {
            return Err(IsogenyError::BenchFormat("R is not P - Q".to_string()));
        }
        Ok((E, TorsionBasis::new(&P, &Q, &params.full_order()?)))
    }
}

/// Parse a bench task document `{"bench_tasks": [...]}`.
pub fn parse_bench_tasks(json: &str) -> Result<Vec<MsidhBenchTask>> {
    let mut document: Value = serde_json::from_str(json)?;
    let tasks = document
        .get_mut(BENCH_TASKS_KEY)
        .map(Value::take)
        .ok_or_else(|| {
            IsogenyError::BenchFormat(format!("document has no \"{BENCH_TASKS_KEY}\" key"))
        })?;
    Ok(serde_json::from_value(tasks)?)
}

/// Serialise tasks as a bench task document, indented by four spaces.
pub fn bench_tasks_to_json(tasks: &[MsidhBenchTask]) -> Result<String> {
    let document = BenchTaskDocument { bench_tasks: tasks };
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| IsogenyError::BenchFormat(e.to_string()))
}

pub fn load_bench_tasks<P: AsRef<Path>>(path: P) -> Result<Vec<MsidhBenchTask>> {
    let tasks = parse_bench_tasks(&fs::read_to_string(path.as_ref())?)?;
    debug!(
        "loaded {} bench tasks from {}",
        tasks.len(),
        path.as_ref().display()
    );
    Ok(tasks)
}

pub fn store_bench_tasks<P: AsRef<Path>>(path: P, tasks: &[MsidhBenchTask]) -> Result<()> {
    fs::write(path.as_ref(), bench_tasks_to_json(tasks)?)?;
    debug!(
        "stored {} bench tasks to {}",
        tasks.len(),
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key() {
        let result = parse_bench_tasks(r#"{"tasks": []}"#);
        assert!(matches!(result, Err(IsogenyError::BenchFormat(_))));
    }

    #[test]
    fn test_parse_document() {
        let json = r#"{
            "bench_tasks": [
                {"t": 4, "a": "6", "xP": "209*i + 332", "yP": "1", "xQ": "345*i + 223",
                 "yQ": "2", "xR": "98*i + 199", "yR": "3"}
            ]
        }"#;
        let tasks = parse_bench_tasks(json).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].t, 4);
        assert_eq!(tasks[0].xQ, "345*i + 223");

        let again = parse_bench_tasks(&bench_tasks_to_json(&tasks).unwrap()).unwrap();
        assert_eq!(tasks, again);
    }
}
