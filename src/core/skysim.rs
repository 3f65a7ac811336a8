//! Synthetic sky-posterior collaborator for the `skymap` family.
//!
//! Stand-in for a real localization pipeline: a source direction and GPS time
//! are drawn, each detector pair contributes a time-of-arrival difference
//! with Gaussian timing noise, and the posterior over a pixelized sky is the
//! product of per-pair delay likelihoods — the familiar localization ring.
//! Pixel directions use a golden-spiral layout rather than a proper
//! isolatitude scheme; coordinate-system fidelity against real skymaps is
//! out of scope here.

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;

/// Seconds per sidereal day; drives the Earth-rotation angle at a GPS time.
const SIDEREAL_DAY_S: f64 = 86_164.0905;

/// One-sigma timing uncertainty per detector pair, in seconds.
const TIMING_SIGMA_S: f64 = 1.0e-3;

/// A detector site as a position vector in light-travel seconds from the
/// geocenter (Earth-fixed frame at GPS epoch zero).
#[derive(Clone, Copy, Debug)]
pub struct Detector {
    pub name: &'static str,
    pub position_s: [f64; 3],
}

const C_M_PER_S: f64 = 299_792_458.0;

/// Approximate Earth-fixed site coordinates in meters.
const SITES: [(&str, [f64; 3]); 5] = [
    ("H1", [-2.161_41e6, -3.834_70e6, 4.600_35e6]),
    ("L1", [-7.427_6e4, -5.496_28e6, 3.224_26e6]),
    ("V1", [4.546_37e6, 8.429_90e5, 4.378_58e6]),
    ("K1", [-3.777_34e6, 3.484_90e6, 3.765_90e6]),
    ("G1", [3.856_31e6, 6.665_99e5, 5.019_64e6]),
];

/// Look up a detector by its usual two-character id (H1, L1, V1, K1, G1).
pub fn detector_by_name(name: &str) -> Option<Detector> {
    SITES.iter().find(|(id, _)| *id == name).map(|(id, m)| Detector {
        name: id,
        position_s: [m[0] / C_M_PER_S, m[1] / C_M_PER_S, m[2] / C_M_PER_S],
    })
}

/// Simulates a high-resolution sky posterior for a random event time within
/// a GPS range, for a fixed detector network.
#[derive(Clone, Debug)]
pub struct SkySimulator {
    detectors: Vec<Detector>,
    gps_start: f64,
    gps_end: f64,
    nside: u32,
    directions: Vec<[f64; 3]>,
}

impl SkySimulator {
    pub fn new(
        ifos: &[String],
        gps_start: f64,
        gps_end: f64,
        nside: u32,
    ) -> Result<Self, String> {
        if ifos.is_empty() {
            return Err("sky simulation requires at least one detector".to_string());
        }
        if nside == 0 {
            return Err("nside must be at least 1".to_string());
        }
        let mut detectors = Vec::with_capacity(ifos.len());
        for name in ifos {
            let det = detector_by_name(name).ok_or_else(|| {
                let known: Vec<&str> = SITES.iter().map(|(id, _)| *id).collect();
                format!("unknown detector '{name}'; known: {}", known.join(", "))
            })?;
            detectors.push(det);
        }

        let npix = 12 * (nside as usize) * (nside as usize);
        let directions = golden_spiral_directions(npix);

        Ok(Self {
            detectors,
            gps_start,
            gps_end,
            nside,
            directions,
        })
    }

    #[inline]
    pub fn npix(&self) -> usize {
        self.directions.len()
    }

    #[inline]
    pub fn nside(&self) -> u32 {
        self.nside
    }

    /// Draw one simulated sky posterior at working resolution. The returned
    /// map is non-negative and sums to 1.
    pub fn simulate(&self, rng: &mut StdRng) -> Vec<f64> {
        let gps = rng.random_range(self.gps_start..self.gps_end);
        let rotation = 2.0 * PI * (gps.rem_euclid(SIDEREAL_DAY_S)) / SIDEREAL_DAY_S;
        let sites: Vec<[f64; 3]> = self
            .detectors
            .iter()
            .map(|d| rotate_z(d.position_s, rotation))
            .collect();

        // Isotropic true direction.
        let z = rng.random_range(-1.0..1.0f64);
        let phi = rng.random_range(0.0..2.0 * PI);
        let s = (1.0 - z * z).max(0.0).sqrt();
        let source = [s * phi.cos(), s * phi.sin(), z];

        // Observed pairwise delays with timing noise.
        let mut baselines = Vec::new();
        for i in 0..sites.len() {
            for j in (i + 1)..sites.len() {
                let b = [
                    sites[i][0] - sites[j][0],
                    sites[i][1] - sites[j][1],
                    sites[i][2] - sites[j][2],
                ];
                let jitter: f64 = rng.sample(StandardNormal);
                let tau_obs = dot(b, source) + TIMING_SIGMA_S * jitter;
                baselines.push((b, tau_obs));
            }
        }

        // Single-detector network: no delay information, flat posterior.
        if baselines.is_empty() {
            let flat = 1.0 / self.npix() as f64;
            return vec![flat; self.npix()];
        }

        let mut log_post: Vec<f64> = self
            .directions
            .iter()
            .map(|&dir| {
                baselines
                    .iter()
                    .map(|&(b, tau_obs)| {
                        let r = (dot(b, dir) - tau_obs) / TIMING_SIGMA_S;
                        -0.5 * r * r
                    })
                    .sum()
            })
            .collect();

        let max = log_post.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for v in log_post.iter_mut() {
            *v = (*v - max).exp();
        }
        let total: f64 = log_post.iter().sum();
        if total > 0.0 {
            for v in log_post.iter_mut() {
                *v /= total;
            }
        }
        log_post
    }
}

/// Downsample a pixel map to `size` bins, assigning each input pixel wholly
/// to one output bin so the total mass is preserved exactly.
pub fn downsample_mass(map: &[f64], size: usize) -> Vec<f64> {
    assert!(size > 0);
    let npix = map.len();
    let mut out = vec![0.0; size];
    if npix == 0 {
        return out;
    }
    for (pix, &mass) in map.iter().enumerate() {
        let idx = (pix * size / npix).min(size - 1);
        out[idx] += mass;
    }
    out
}

/// Near-uniform unit directions via the golden-angle spiral.
fn golden_spiral_directions(n: usize) -> Vec<[f64; 3]> {
    let golden_angle = PI * (3.0 - 5.0f64.sqrt());
    (0..n)
        .map(|i| {
            let z = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
            let r = (1.0 - z * z).max(0.0).sqrt();
            let phi = golden_angle * i as f64;
            [r * phi.cos(), r * phi.sin(), z]
        })
        .collect()
}

#[inline]
fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn rotate_z(v: [f64; 3], angle: f64) -> [f64; 3] {
    let (sin, cos) = angle.sin_cos();
    [v[0] * cos - v[1] * sin, v[0] * sin + v[1] * cos, v[2]]
}
