use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{GeneratorError, Result};
use crate::power_law::PowerLaw;

/// Smallest community that can be split: both halves keep at least three members.
pub const MIN_SPLITTABLE: usize = 6;

/// Generator parameters.
///
/// Every field can be given on the command line or in a TOML file using the
/// short names below (`V`, `vexp`, `cnum`, ...). Missing entries take the
/// defaults shown.
#[derive(Debug, Clone, PartialEq, Args, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    /// Initial number of vertices
    #[arg(short = 'V', long = "vertices", default_value_t = 1000)]
    #[serde(rename = "V")]
    pub v: usize,

    /// Vertex energy power-law exponent (density ~ x^-vexp)
    #[arg(long, default_value_t = 2.0)]
    pub vexp: f64,
    /// Smallest vertex energy
    #[arg(long, default_value_t = 0.1)]
    pub vmin: f64,
    /// Largest vertex energy, also the reference energy for edge lag
    #[arg(long, default_value_t = 1.0)]
    pub vmax: f64,

    /// Community size power-law exponent
    #[arg(long, default_value_t = 2.0)]
    pub cexp: f64,
    /// Smallest sampled community size
    #[arg(long, default_value_t = 5.0)]
    pub cmin: f64,
    /// Largest sampled community size
    #[arg(long, default_value_t = 50.0)]
    pub cmax: f64,
    /// Fixed number of initial communities (overrides vmem)
    #[arg(long)]
    pub cnum: Option<usize>,
    /// Target average number of memberships per vertex
    #[arg(long, default_value_t = 1.2)]
    pub vmem: f64,

    /// Expected fraction of internal edges
    #[arg(long, default_value_t = 0.85)]
    pub mp: f64,
    /// Pull of the lower-lag member on an edge's lag
    #[arg(long, default_value_t = 0.2)]
    pub grav: f64,
    /// Lag of a vertex at maximum energy
    #[arg(long, default_value_t = 0.2)]
    pub minlag: f64,

    /// Lower bound of the per-window vertex growth fraction
    #[arg(long, default_value_t = 0.2)]
    pub vnewmin: f64,
    /// Upper bound of the per-window vertex growth fraction
    #[arg(long, default_value_t = 0.4)]
    pub vnewmax: f64,
    /// Probability that a community dies in a window
    #[arg(long, default_value_t = 0.1)]
    pub cdie: f64,
    /// Probability that a community grows rather than shrinks
    #[arg(long, default_value_t = 0.5)]
    pub pgrow: f64,
    /// Largest relative size change of a growing or shrinking community
    #[arg(long, default_value_t = 0.25)]
    pub maxgrow: f64,
    /// Merge exponent: a community is marked for merging with probability size^-pmerge
    #[arg(long, default_value_t = 1.0)]
    pub pmerge: f64,
    /// Split rate per member
    #[arg(long, default_value_t = 0.005)]
    pub psplit: f64,
    /// Probability that a member moved by a split stays in both halves
    #[arg(long, default_value_t = 0.1)]
    pub dup: f64,
    /// Smallest community size eligible for splitting
    #[arg(long, default_value_t = 6)]
    pub minsplit: usize,
    /// New communities per window, as a fraction of the community count
    #[arg(long, default_value_t = 0.1)]
    pub cnew: f64,

    /// Number of windows to generate
    #[arg(short = 't', long = "windows", default_value_t = 10)]
    #[serde(rename = "t")]
    pub t: usize,
    /// File name prefix of the per-window transition logs
    #[arg(long, default_value = "Transitions")]
    pub fout: String,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            v: 1000,
            vexp: 2.0,
            vmin: 0.1,
            vmax: 1.0,
            cexp: 2.0,
            cmin: 5.0,
            cmax: 50.0,
            cnum: None,
            vmem: 1.2,
            mp: 0.85,
            grav: 0.2,
            minlag: 0.2,
            vnewmin: 0.2,
            vnewmax: 0.4,
            cdie: 0.1,
            pgrow: 0.5,
            maxgrow: 0.25,
            pmerge: 1.0,
            psplit: 0.005,
            dup: 0.1,
            minsplit: 6,
            cnew: 0.1,
            t: 10,
            fout: "Transitions".to_string(),
        }
    }
}

impl Params {
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params = Self::from_toml_str(&text).map_err(|source| GeneratorError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(GeneratorError::InvalidParams(msg));

        for (name, x) in [
            ("vexp", self.vexp),
            ("vmin", self.vmin),
            ("vmax", self.vmax),
            ("cexp", self.cexp),
            ("cmin", self.cmin),
            ("cmax", self.cmax),
            ("vmem", self.vmem),
            ("mp", self.mp),
            ("grav", self.grav),
            ("minlag", self.minlag),
            ("vnewmin", self.vnewmin),
            ("vnewmax", self.vnewmax),
            ("cdie", self.cdie),
            ("pgrow", self.pgrow),
            ("maxgrow", self.maxgrow),
            ("pmerge", self.pmerge),
            ("psplit", self.psplit),
            ("dup", self.dup),
            ("cnew", self.cnew),
        ] {
            if !x.is_finite() {
                return invalid(format!("{name} must be a finite number, got {x}"));
            }
        }
        if self.v == 0 {
            return invalid("V must be at least 1".into());
        }
        if self.cnum == Some(0) {
            return invalid("cnum must be at least 1 when given".into());
        }
        if !(self.mp > 0.0 && self.mp <= 1.0) {
            return invalid(format!("mp must lie in (0, 1], got {}", self.mp));
        }
        if self.minlag <= 0.0 {
            return invalid(format!("minlag must be positive, got {}", self.minlag));
        }
        if self.vmin <= 0.0 {
            return invalid(format!("vmin must be positive, got {}", self.vmin));
        }
        if self.cmin < 1.0 {
            return invalid(format!("cmin must be at least 1, got {}", self.cmin));
        }
        if self.minsplit < MIN_SPLITTABLE {
            return invalid(format!(
                "minsplit must be at least {MIN_SPLITTABLE}, got {}",
                self.minsplit
            ));
        }
        for (name, lo, hi) in [
            ("vmin/vmax", self.vmin, self.vmax),
            ("cmin/cmax", self.cmin, self.cmax),
            ("vnewmin/vnewmax", self.vnewmin, self.vnewmax),
        ] {
            if lo > hi {
                return invalid(format!("{name}: {lo} exceeds {hi}"));
            }
        }
        for (name, p) in [
            ("cdie", self.cdie),
            ("pgrow", self.pgrow),
            ("dup", self.dup),
            ("grav", self.grav),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} must lie in [0, 1], got {p}"));
            }
        }
        for (name, x) in [
            ("vnewmin", self.vnewmin),
            ("maxgrow", self.maxgrow),
            ("pmerge", self.pmerge),
            ("psplit", self.psplit),
            ("cnew", self.cnew),
            ("vmem", self.vmem),
        ] {
            if x < 0.0 {
                return invalid(format!("{name} must not be negative, got {x}"));
            }
        }
        Ok(())
    }

    pub fn energy_law(&self) -> PowerLaw {
        PowerLaw::new(-self.vexp, self.vmin, self.vmax)
    }

    pub fn size_law(&self) -> PowerLaw {
        PowerLaw::new(-self.cexp, self.cmin, self.cmax)
    }
}
