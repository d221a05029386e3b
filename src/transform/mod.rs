//! # Parameter Transforms
//!
//! A [`Transform`] is a parameterized numeric function conventionally applied
//! to raw channel values before display or gating. Five kinds are supported,
//! following the Gating-ML 2.0 definitions:
//!
//! | Kind | Arguments | Function |
//! |------|-----------|----------|
//! | [`TransformKind::ParameterizedLinear`] | `t`, `a` | `(x + A) / (T + A)` |
//! | [`TransformKind::ParameterizedLogarithmic`] | `t`, `m` | `log10(x / T) / M + 1` |
//! | [`TransformKind::ParameterizedInverseHyperbolicSine`] | `t`, `a`, `m` | arcsinh family |
//! | [`TransformKind::Logicle`] | `t`, `a`, `m`, `w` | inverse of the biexponential |
//! | [`TransformKind::Hyperlog`] | `t`, `a`, `m`, `w` | inverse of the linear-exponential |
//!
//! A transform whose type could not be recognized is kept as
//! [`TransformFunction::Custom`] so that it can be reported, but it cannot be
//! evaluated.
//!
//! ## Example
//!
//! ```rust
//! use flowgate::transform::Transform;
//!
//! let logicle = Transform::logicle(262144.0, 0.0, 4.5, 0.5).with_name("FL1 logicle");
//! let y = logicle.apply(262144.0).unwrap();
//! assert!((y - 1.0).abs() < 1e-9);
//! ```

mod functions;


use std::fmt;
use std::str::FromStr;

/// Errors raised when building or validating a transform
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    /// The transform type name is not one of the known kinds
    #[error("Unrecognized transform type: {0}")]
    UnknownType(String),

    /// A recognized kind is missing one or more of its required arguments
    #[error("{kind} transform is missing required argument(s): {missing}")]
    MissingArguments {
        /// Kind being constructed
        kind: TransformKind,
        /// Comma-separated list of the missing argument names
        missing: String,
    },

    /// An argument is outside the domain of the transform
    #[error("{kind} transform argument {argument} = {value} is invalid: {reason}")]
    InvalidArgument {
        /// Kind being validated
        kind: TransformKind,
        /// Argument name
        argument: char,
        /// Offending value
        value: f64,
        /// Constraint that was violated
        reason: &'static str,
    },

    /// The transform has no evaluable definition
    #[error("Custom transform type {0:?} cannot be evaluated")]
    NotEvaluable(String),
}

/// The five known transform kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// Linear scaling with offset
    ParameterizedLinear,
    /// Base-10 logarithm over M decades
    ParameterizedLogarithmic,
    /// Inverse hyperbolic sine
    ParameterizedInverseHyperbolicSine,
    /// Logicle (biexponential)
    Logicle,
    /// Hyperlog
    Hyperlog,
}

impl TransformKind {
    /// All kinds, in declaration order
    pub const ALL: [TransformKind; 5] = [
        TransformKind::ParameterizedLinear,
        TransformKind::ParameterizedLogarithmic,
        TransformKind::ParameterizedInverseHyperbolicSine,
        TransformKind::Logicle,
        TransformKind::Hyperlog,
    ];

    /// Canonical type name written to files
    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::ParameterizedLinear => "ParameterizedLinear",
            TransformKind::ParameterizedLogarithmic => "ParameterizedLogarithmic",
            TransformKind::ParameterizedInverseHyperbolicSine => {
                "ParameterizedInverseHyperbolicSine"
            }
            TransformKind::Logicle => "Logicle",
            TransformKind::Hyperlog => "Hyperlog",
        }
    }

    /// Alternative names accepted when parsing (Gating-ML function names and
    /// common short forms)
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            TransformKind::ParameterizedLinear => &["flin", "linear"],
            TransformKind::ParameterizedLogarithmic => &["flog", "log", "logarithmic"],
            TransformKind::ParameterizedInverseHyperbolicSine => &["fasinh", "asinh", "arcsinh"],
            TransformKind::Logicle => &["biexponential"],
            TransformKind::Hyperlog => &[],
        }
    }

    /// Resolve a type name (case-insensitive, canonical name or alias)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|kind| {
            kind.name().eq_ignore_ascii_case(name)
                || kind.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }

    /// Argument names this kind requires
    pub fn required_arguments(&self) -> &'static [char] {
        match self {
            TransformKind::ParameterizedLinear => &['t', 'a'],
            TransformKind::ParameterizedLogarithmic => &['t', 'm'],
            TransformKind::ParameterizedInverseHyperbolicSine => &['t', 'a', 'm'],
            TransformKind::Logicle | TransformKind::Hyperlog => &['t', 'a', 'm', 'w'],
        }
    }
}

impl FromStr for TransformKind {
    type Err = TransformError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| TransformError::UnknownType(name.trim().to_string()))
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loose collection of named arguments, as gathered from a file
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformArguments {
    /// Top of scale
    pub t: Option<f64>,
    /// Additional negative decades or offset
    pub a: Option<f64>,
    /// Positive decades
    pub m: Option<f64>,
    /// Linearization width
    pub w: Option<f64>,
}

impl TransformArguments {
    /// Look up an argument by its single-letter name
    pub fn get(&self, argument: char) -> Option<f64> {
        match argument {
            't' => self.t,
            'a' => self.a,
            'm' => self.m,
            'w' => self.w,
            _ => None,
        }
    }

    /// Set an argument by its single-letter name. Returns false for unknown names.
    pub fn set(&mut self, argument: char, value: f64) -> bool {
        let slot = match argument {
            't' => &mut self.t,
            'a' => &mut self.a,
            'm' => &mut self.m,
            'w' => &mut self.w,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// True if no argument is set
    pub fn is_empty(&self) -> bool {
        self.t.is_none() && self.a.is_none() && self.m.is_none() && self.w.is_none()
    }
}

/// The numeric definition of a transform
#[derive(Debug, Clone, PartialEq)]
pub enum TransformFunction {
    /// `(x + a) / (t + a)`
    ParameterizedLinear {
        /// Top of scale
        t: f64,
        /// Offset
        a: f64,
    },
    /// `log10(x / t) / m + 1`
    ParameterizedLogarithmic {
        /// Top of scale
        t: f64,
        /// Number of decades
        m: f64,
    },
    /// Inverse hyperbolic sine
    ParameterizedInverseHyperbolicSine {
        /// Top of scale
        t: f64,
        /// Additional negative decades
        a: f64,
        /// Positive decades
        m: f64,
    },
    /// Logicle
    Logicle {
        /// Top of scale
        t: f64,
        /// Additional negative decades
        a: f64,
        /// Positive decades
        m: f64,
        /// Linearization width in decades
        w: f64,
    },
    /// Hyperlog
    Hyperlog {
        /// Top of scale
        t: f64,
        /// Additional negative decades
        a: f64,
        /// Positive decades
        m: f64,
        /// Linearization width in decades
        w: f64,
    },
    /// An unrecognized transform, kept with its declared type name
    Custom {
        /// Type name as found in the source
        type_name: String,
    },
}

/// A parameterized transform with an optional name and description
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Optional display name
    pub name: Option<String>,
    /// Optional free-text description
    pub description: Option<String>,
    /// Numeric definition
    pub function: TransformFunction,
}

impl Transform {
    fn from_function(function: TransformFunction) -> Self {
        Self {
            name: None,
            description: None,
            function,
        }
    }

    /// Linear transform
    pub fn linear(t: f64, a: f64) -> Self {
        Self::from_function(TransformFunction::ParameterizedLinear { t, a })
    }

    /// Logarithmic transform
    pub fn logarithmic(t: f64, m: f64) -> Self {
        Self::from_function(TransformFunction::ParameterizedLogarithmic { t, m })
    }

    /// Inverse hyperbolic sine transform
    pub fn asinh(t: f64, a: f64, m: f64) -> Self {
        Self::from_function(TransformFunction::ParameterizedInverseHyperbolicSine { t, a, m })
    }

    /// Logicle transform
    pub fn logicle(t: f64, a: f64, m: f64, w: f64) -> Self {
        Self::from_function(TransformFunction::Logicle { t, a, m, w })
    }

    /// Hyperlog transform
    pub fn hyperlog(t: f64, a: f64, m: f64, w: f64) -> Self {
        Self::from_function(TransformFunction::Hyperlog { t, a, m, w })
    }

    /// Unrecognized transform carrying its declared type name
    pub fn custom(type_name: impl Into<String>) -> Self {
        Self::from_function(TransformFunction::Custom {
            type_name: type_name.into(),
        })
    }

    /// Build a transform of the given kind from loosely collected arguments.
    ///
    /// Fails if any argument the kind requires is absent. Arguments the kind
    /// does not use are ignored.
    pub fn from_arguments(
        kind: TransformKind,
        arguments: &TransformArguments,
    ) -> Result<Self, TransformError> {
        let missing: Vec<String> = kind
            .required_arguments()
            .iter()
            .filter(|&&arg| arguments.get(arg).is_none())
            .map(|arg| arg.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(TransformError::MissingArguments {
                kind,
                missing: missing.join(", "),
            });
        }

        let (t, a, m, w) = (
            arguments.t.unwrap_or_default(),
            arguments.a.unwrap_or_default(),
            arguments.m.unwrap_or_default(),
            arguments.w.unwrap_or_default(),
        );
        Ok(match kind {
            TransformKind::ParameterizedLinear => Self::linear(t, a),
            TransformKind::ParameterizedLogarithmic => Self::logarithmic(t, m),
            TransformKind::ParameterizedInverseHyperbolicSine => Self::asinh(t, a, m),
            TransformKind::Logicle => Self::logicle(t, a, m, w),
            TransformKind::Hyperlog => Self::hyperlog(t, a, m, w),
        })
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The transform kind, or `None` for a custom transform
    pub fn kind(&self) -> Option<TransformKind> {
        match self.function {
            TransformFunction::ParameterizedLinear { .. } => {
                Some(TransformKind::ParameterizedLinear)
            }
            TransformFunction::ParameterizedLogarithmic { .. } => {
                Some(TransformKind::ParameterizedLogarithmic)
            }
            TransformFunction::ParameterizedInverseHyperbolicSine { .. } => {
                Some(TransformKind::ParameterizedInverseHyperbolicSine)
            }
            TransformFunction::Logicle { .. } => Some(TransformKind::Logicle),
            TransformFunction::Hyperlog { .. } => Some(TransformKind::Hyperlog),
            TransformFunction::Custom { .. } => None,
        }
    }

    /// Type name: the canonical kind name, or the declared name for a custom transform
    pub fn type_name(&self) -> &str {
        match &self.function {
            TransformFunction::Custom { type_name } => type_name,
            _ => self.kind().map(|k| k.name()).unwrap_or_default(),
        }
    }

    /// True for an unrecognized transform
    pub fn is_custom(&self) -> bool {
        matches!(self.function, TransformFunction::Custom { .. })
    }

    /// The arguments this transform carries; unused slots are `None`
    pub fn arguments(&self) -> TransformArguments {
        match self.function {
            TransformFunction::ParameterizedLinear { t, a } => TransformArguments {
                t: Some(t),
                a: Some(a),
                ..Default::default()
            },
            TransformFunction::ParameterizedLogarithmic { t, m } => TransformArguments {
                t: Some(t),
                m: Some(m),
                ..Default::default()
            },
            TransformFunction::ParameterizedInverseHyperbolicSine { t, a, m } => {
                TransformArguments {
                    t: Some(t),
                    a: Some(a),
                    m: Some(m),
                    w: None,
                }
            }
            TransformFunction::Logicle { t, a, m, w }
            | TransformFunction::Hyperlog { t, a, m, w } => TransformArguments {
                t: Some(t),
                a: Some(a),
                m: Some(m),
                w: Some(w),
            },
            TransformFunction::Custom { .. } => TransformArguments::default(),
        }
    }

    /// Check that every argument lies in the domain of its transform
    pub fn validate(&self) -> Result<(), TransformError> {
        functions::validate(self)
    }

    /// Evaluate the transform at `x`. Returns `None` for a custom transform.
    ///
    /// Arguments are not validated here; out-of-domain arguments yield NaN or
    /// infinite results. Call [`Transform::validate`] first when the source is
    /// untrusted.
    pub fn apply(&self, x: f64) -> Option<f64> {
        functions::apply(&self.function, x)
    }

    /// Evaluate the transform over a slice, failing for a custom transform
    pub fn apply_all(&self, values: &[f64]) -> Result<Vec<f64>, TransformError> {
        let evaluator = functions::Evaluator::new(&self.function)
            .ok_or_else(|| TransformError::NotEvaluable(self.type_name().to_string()))?;
        Ok(values.iter().map(|&x| evaluator.eval(x)).collect())
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name())?;
        let arguments = self.arguments();
        let mut first = true;
        for name in ['t', 'a', 'm', 'w'] {
            if let Some(value) = arguments.get(name) {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{}={}", name, value)?;
                first = false;
            }
        }
        f.write_str(")")?;
        if let Some(name) = &self.name {
            write!(f, " \"{}\"", name)?;
        }
        Ok(())
    }
}
