use crate::data::{KinBin, Psf};

use serde::{Deserialize, Serialize};

/// Binned kinematic measurements together with the PSF they were observed with
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KinData {
    kin_bin: KinBin,
    psf: Psf,
}

impl KinData {
    pub fn new(kin_bin: KinBin, psf: Psf) -> Self {
        Self { kin_bin, psf }
    }

    pub fn kin_bin(&self) -> &KinBin {
        &self.kin_bin
    }

    pub fn psf(&self) -> &Psf {
        &self.psf
    }
}
