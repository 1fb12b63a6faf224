//! Model variant selection.

use anyhow::Result;

/// The closed set of Miq model variants.
///
/// Variants share the same layer stack and differ only in the dilation rate of
/// the second convolution. Checkpoints identify a variant by a small integer
/// id; `from_id` is the only place those ids are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelVariant {
    /// Standard convolution (dilation 1). Wire id 0.
    #[default]
    Standard,
    /// Dilated second convolution (dilation 2), enlarging the receptive field
    /// without adding parameters. Wire id 1.
    Dilated,
}

impl ModelVariant {
    /// Dilation rate of the second convolution.
    #[must_use]
    pub const fn dilation(self) -> usize {
        match self {
            Self::Standard => 1,
            Self::Dilated => 2,
        }
    }

    /// Integer id used by checkpoints and the CLI.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Standard => 0,
            Self::Dilated => 1,
        }
    }

    /// Resolves a variant from its integer id.
    ///
    /// # Errors
    ///
    /// Returns an error for any id other than 0 or 1.
    pub fn from_id(id: u32) -> Result<Self> {
        match id {
            0 => Ok(Self::Standard),
            1 => Ok(Self::Dilated),
            other => anyhow::bail!(
                "unsupported model id {other} (known ids: 0 = standard, 1 = dilated)"
            ),
        }
    }

    /// Short name used in logs and weight file names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Dilated => "dilated",
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
