//! Responsive grid configuration and layout value types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Number of grid units available per row.
pub const GRID_UNITS: u8 = 12;

/// Column counts accepted by the legacy fixed-column container grid.
const FIXED_COL_OPTIONS: [u8; 6] = [1, 2, 3, 4, 6, 12];

/// Named grid breakpoints, smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

/// Grid-unit counts per breakpoint.
///
/// An absent breakpoint means "inherit from the next larger defined
/// breakpoint" at render time; that resolution is owned by the renderer and
/// not validated here. Configs are constructed whole and replaced whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsiveConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xs: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lg: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xl: Option<u8>,
}

impl ResponsiveConfig {
    /// Create an empty config with no breakpoints defined
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for one breakpoint
    pub fn with(mut self, breakpoint: Breakpoint, value: u8) -> Self {
        match breakpoint {
            Breakpoint::Xs => self.xs = Some(value),
            Breakpoint::Sm => self.sm = Some(value),
            Breakpoint::Md => self.md = Some(value),
            Breakpoint::Lg => self.lg = Some(value),
            Breakpoint::Xl => self.xl = Some(value),
        }
        self
    }

    /// Get the value defined for a breakpoint, if any
    pub fn get(&self, breakpoint: Breakpoint) -> Option<u8> {
        match breakpoint {
            Breakpoint::Xs => self.xs,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
        }
    }

    /// Iterate over the breakpoints that carry a value, smallest first
    pub fn values(&self) -> impl Iterator<Item = (Breakpoint, u8)> {
        [
            (Breakpoint::Xs, self.xs),
            (Breakpoint::Sm, self.sm),
            (Breakpoint::Md, self.md),
            (Breakpoint::Lg, self.lg),
            (Breakpoint::Xl, self.xl),
        ]
        .into_iter()
        .filter_map(|(breakpoint, value)| value.map(|v| (breakpoint, v)))
    }

    /// Validate that every present value is a grid-unit count in `1..=12`
    pub fn validate(&self) -> Result<()> {
        for (_, value) in self.values() {
            if value < 1 || value > GRID_UNITS {
                return Err(DomainError::invalid_value(format!(
                    "grid value {value} outside 1..={GRID_UNITS}"
                )));
            }
        }
        Ok(())
    }

    /// Validate against the legacy fixed-column container grid, which only
    /// supports column counts dividing the row evenly.
    pub fn validate_fixed_cols(&self) -> Result<()> {
        for (_, value) in self.values() {
            if !FIXED_COL_OPTIONS.contains(&value) {
                return Err(DomainError::invalid_value(format!(
                    "{value} Cols not supported"
                )));
            }
        }
        Ok(())
    }
}

/// Grid placement for a single node or field.
///
/// `cols` is only meaningful on container nodes and follows the fixed-column
/// rule; the four position/span configs follow the `1..=12` range rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub col_start: ResponsiveConfig,
    pub col_span: ResponsiveConfig,
    pub row_start: ResponsiveConfig,
    pub row_span: ResponsiveConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<ResponsiveConfig>,
}

impl Layout {
    pub fn validate(&self) -> Result<()> {
        self.col_start.validate()?;
        self.col_span.validate()?;
        self.row_start.validate()?;
        self.row_span.validate()?;
        if let Some(cols) = &self.cols {
            cols.validate_fixed_cols()?;
        }
        Ok(())
    }

    /// Merge a partial update onto this layout, validating the result before
    /// returning it. Unspecified patch fields keep their previous value.
    pub fn apply(&self, patch: &LayoutPatch) -> Result<Layout> {
        let merged = Layout {
            col_start: patch.col_start.clone().unwrap_or_else(|| self.col_start.clone()),
            col_span: patch.col_span.clone().unwrap_or_else(|| self.col_span.clone()),
            row_start: patch.row_start.clone().unwrap_or_else(|| self.row_start.clone()),
            row_span: patch.row_span.clone().unwrap_or_else(|| self.row_span.clone()),
            cols: patch.cols.clone().or_else(|| self.cols.clone()),
        };
        merged.validate()?;
        Ok(merged)
    }
}

/// Partial layout update; `None` fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_start: Option<ResponsiveConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_span: Option<ResponsiveConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_start: Option<ResponsiveConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<ResponsiveConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<ResponsiveConfig>,
}
