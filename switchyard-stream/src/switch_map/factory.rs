// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::Display;
use switchyard_core::SwitchError;

/// Creates the inner stream for a token.
///
/// Implemented by [`Make`] for infallible closures and by [`TryMake`] for closures that
/// can reject a token.
pub trait InnerFactory<A> {
    /// The inner stream produced for each token
    type Inner;

    /// Create a fresh, not yet polled inner stream for `token`.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchError::FactoryError`] when no inner stream can be created.
    fn create(&mut self, token: A) -> Result<Self::Inner, SwitchError>;
}

/// Factory backed by a closure that always produces an inner stream.
#[derive(Debug, Clone)]
pub struct Make<F>(F);

impl<F> Make<F> {
    /// Wrap `make`.
    pub const fn new(make: F) -> Self {
        Self(make)
    }
}

impl<A, U, F> InnerFactory<A> for Make<F>
where
    F: FnMut(A) -> U,
{
    type Inner = U;

    fn create(&mut self, token: A) -> Result<U, SwitchError> {
        Ok((self.0)(token))
    }
}

/// Factory backed by a fallible closure.
///
/// The closure's error is rendered into a [`SwitchError::FactoryError`].
#[derive(Debug, Clone)]
pub struct TryMake<F>(F);

impl<F> TryMake<F> {
    /// Wrap `make`.
    pub const fn new(make: F) -> Self {
        Self(make)
    }
}

impl<A, U, E, F> InnerFactory<A> for TryMake<F>
where
    F: FnMut(A) -> Result<U, E>,
    E: Display,
{
    type Inner = U;

    fn create(&mut self, token: A) -> Result<U, SwitchError> {
        (self.0)(token).map_err(|error| SwitchError::factory_error(error.to_string()))
    }
}
