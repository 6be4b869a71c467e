//! Call descriptors for exported functions
//!
//! A `FunctionCall` carries the signature of one export and checks a
//! caller's arguments against it before anything is dispatched.

use super::marshal::managed_type_name;
use super::types::FfiType;
use crate::errors::MarshalError;
use std::fmt;

/// A value that can be checked against a boundary type
pub trait BoundaryValue {
    fn conforms_to(&self, ty: &FfiType) -> bool;

    /// Managed type name, for mismatch diagnostics
    fn type_name(&self) -> String;
}

/// Parameter and return types of one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<FfiType>,
    pub ret: FfiType,
}

impl Signature {
    pub fn new(params: Vec<FfiType>, ret: FfiType) -> Self {
        Self { params, ret }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Function call descriptor
#[derive(Debug, Clone)]
pub struct FunctionCall {
    name: &'static str,
    signature: Signature,
}

impl FunctionCall {
    pub fn new(name: &'static str, params: Vec<FfiType>, ret: FfiType) -> Self {
        Self {
            name,
            signature: Signature::new(params, ret),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Check arity, then each argument in order
    pub fn validate<V: BoundaryValue>(&self, args: &[V]) -> Result<(), MarshalError> {
        if args.len() != self.signature.arity() {
            return Err(MarshalError::ArgCountMismatch {
                function: self.name.to_string(),
                expected: self.signature.arity(),
                found: args.len(),
            });
        }

        for (param, (arg, ty)) in args.iter().zip(&self.signature.params).enumerate() {
            if !arg.conforms_to(ty) {
                return Err(MarshalError::TypeMismatch {
                    param,
                    expected: managed_type_name(ty),
                    found: arg.type_name(),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.signature.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")?;
        if self.signature.ret != FfiType::Void {
            write!(f, " -> {}", self.signature.ret)?;
        }
        Ok(())
    }
}
