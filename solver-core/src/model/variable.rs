//! Decision variables.

use std::fmt;

/// Stable identifier of a variable inside one [`Model`](super::Model).
///
/// Identifiers are dense indices assigned in creation order, so they double as
/// column indices in the standard form and as positions in primal vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Wrap a raw column index.
    ///
    /// Ids created this way are only meaningful for a model that has at least
    /// `index + 1` variables; the builder rejects anything else.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Column index of this variable.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarDomain {
    /// Continuous variable within its bounds.
    Continuous,
    /// Binary variable: continuous in `[0, 1]` for the LP, `{0, 1}` for B&B.
    Binary,
}

impl VarDomain {
    /// Short lowercase name, used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            VarDomain::Continuous => "continuous",
            VarDomain::Binary => "binary",
        }
    }
}

/// Domain tag carried by a variable so that decoders can map a primal vector
/// back to problem terms without keeping side tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VarTag {
    /// Selection variable of the project with this index.
    Project(usize),
    /// Selection variable of the arc with this index.
    Arc(usize),
    /// Any helper variable introduced by a formulation.
    #[default]
    Auxiliary,
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Identifier (column index).
    pub id: VarId,
    /// Domain.
    pub domain: VarDomain,
    /// Lower bound, possibly `-inf` for continuous variables.
    pub lower: f64,
    /// Upper bound, possibly `+inf` for continuous variables.
    pub upper: f64,
    /// Optional human-readable name.
    pub name: Option<String>,
    /// Domain tag.
    pub tag: VarTag,
}

impl Variable {
    /// True for binary variables.
    pub fn is_binary(&self) -> bool {
        self.domain == VarDomain::Binary
    }

    /// True when both bounds are infinite.
    pub fn is_free(&self) -> bool {
        self.lower == f64::NEG_INFINITY && self.upper == f64::INFINITY
    }

    /// Name if set, otherwise the `x{index}` form.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}
