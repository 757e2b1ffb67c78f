//! The concatenation operation used to merge streamed chunks.

use crate::error::Result;

/// A value that can absorb a later partial value of the same type.
///
/// `a.concat(&b)` treats `b` as the chunk produced after `a`. There is no
/// identity element: a fold starts from the first chunk produced.
pub trait Concat: Sized + Clone {
    fn concat(&self, other: &Self) -> Self;
}

impl Concat for String {
    fn concat(&self, other: &Self) -> Self {
        let mut merged = String::with_capacity(self.len() + other.len());
        merged.push_str(self);
        merged.push_str(other);
        merged
    }
}

/// Implement `std::ops::Add` in terms of [`Concat`].
macro_rules! impl_add_via_concat {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl std::ops::Add for $ty {
                type Output = $ty;

                fn add(self, other: $ty) -> $ty {
                    $crate::messages::concat::Concat::concat(&self, &other)
                }
            }
        )+
    };
}

pub(crate) use impl_add_via_concat;

/// Resolve a strict concatenation permissively: on failure keep `left`.
pub(crate) fn or_keep_left<T: Clone>(left: &T, merged: Result<T>) -> T {
    match merged {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                target: "chain_core::messages",
                %err,
                "incompatible chunk ignored, keeping the accumulated value"
            );
            left.clone()
        }
    }
}
