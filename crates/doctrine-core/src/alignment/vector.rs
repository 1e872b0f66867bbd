//! Vector - points in identity space
//!
//! Every state, candidate and anchor handled by the lock is a `Vector`.
//! Binary operations check dimensionality and report a [`ShapeError`]
//! instead of panicking, so malformed input always reaches the caller.

use crate::error::ShapeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mathematical vector in identity space
///
/// # Examples
///
/// ```
/// use doctrine_core::alignment::vector::Vector;
///
/// let v = Vector::new(vec![3.0, 4.0]);
/// assert_eq!(v.magnitude(), 5.0);
/// assert_eq!(v.dimension(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    /// Vector components
    pub components: Vec<f64>,
}

impl Vector {
    /// Create a new vector
    pub fn new(components: Vec<f64>) -> Self {
        Self { components }
    }

    /// Create a zero vector of given dimension
    pub fn zero(dimension: usize) -> Self {
        Self {
            components: vec![0.0; dimension],
        }
    }

    /// Parse a comma-separated list such as `"1.0, 0.1, 0"`
    ///
    /// Surrounding brackets are tolerated. Every token must be a finite
    /// number.
    pub fn parse(input: &str) -> Result<Self, ShapeError> {
        let trimmed = input
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .trim();

        if trimmed.is_empty() {
            return Ok(Self::new(Vec::new()));
        }

        let components = trimmed
            .split(',')
            .map(|token| {
                let token = token.trim();
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|x| x.is_finite())
                    .ok_or_else(|| ShapeError::NotNumeric(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(components))
    }

    /// Get the dimension of this vector
    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    /// Borrow the components
    pub fn as_slice(&self) -> &[f64] {
        &self.components
    }

    /// Compute magnitude (L2 norm)
    pub fn magnitude(&self) -> f64 {
        self.components.iter().map(|&x| x * x).sum::<f64>().sqrt()
    }

    /// True when the L2 norm is exactly zero
    pub fn is_zero(&self) -> bool {
        self.magnitude() == 0.0
    }

    /// Dot product with another vector
    pub fn dot(&self, other: &Vector) -> Result<f64, ShapeError> {
        ShapeError::check("dot product", self.dimension(), other.dimension())?;

        Ok(self
            .components
            .iter()
            .zip(&other.components)
            .map(|(&a, &b)| a * b)
            .sum())
    }

    /// Add two vectors
    pub fn add(&self, other: &Vector) -> Result<Self, ShapeError> {
        ShapeError::check("vector addition", self.dimension(), other.dimension())?;

        Ok(Self {
            components: self
                .components
                .iter()
                .zip(&other.components)
                .map(|(&a, &b)| a + b)
                .collect(),
        })
    }

    /// Subtract `other` from this vector
    pub fn sub(&self, other: &Vector) -> Result<Self, ShapeError> {
        ShapeError::check("vector subtraction", self.dimension(), other.dimension())?;

        Ok(Self {
            components: self
                .components
                .iter()
                .zip(&other.components)
                .map(|(&a, &b)| a - b)
                .collect(),
        })
    }

    /// Euclidean distance to another vector
    pub fn distance(&self, other: &Vector) -> Result<f64, ShapeError> {
        Ok(self.sub(other)?.magnitude())
    }

    /// Scalar multiplication
    pub fn scale(&self, scalar: f64) -> Self {
        Self {
            components: self.components.iter().map(|&x| x * scalar).collect(),
        }
    }

    /// Get component at index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.components.get(index).copied()
    }

    /// Element-wise arithmetic mean of a set of vectors
    ///
    /// Returns `None` for an empty set.
    pub fn mean<'a, I>(vectors: I) -> Result<Option<Self>, ShapeError>
    where
        I: IntoIterator<Item = &'a Vector>,
    {
        let mut iter = vectors.into_iter();
        let Some(first) = iter.next() else {
            return Ok(None);
        };

        let mut sum = first.clone();
        let mut count = 1usize;
        for v in iter {
            sum = sum.add(v)?;
            count += 1;
        }

        let n = count as f64;
        Ok(Some(Self {
            components: sum.components.into_iter().map(|x| x / n).collect(),
        }))
    }
}

impl From<Vec<f64>> for Vector {
    fn from(components: Vec<f64>) -> Self {
        Self::new(components)
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(components: [f64; N]) -> Self {
        Self::new(components.to_vec())
    }
}

impl From<&[f64]> for Vector {
    fn from(components: &[f64]) -> Self {
        Self::new(components.to_vec())
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, x) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x:.4}")?;
        }
        write!(f, "]")
    }
}
