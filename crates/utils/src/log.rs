// This file is part of ENSNode.
//
// ENSNode is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// ENSNode is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with ENSNode.
// If not, see https://www.gnu.org/licenses/.

//! Helper traits for logging errors while propagating them

use std::fmt::{Debug, Display};

use tracing::Level;

/// Trait for logging an error if there is one on a result-like object
pub trait LogOnError {
    /// Log at error level if there is an error, preserving the original error type
    fn log_on_error<C>(self, context: C) -> Self
    where
        C: Display + Send + Sync + 'static;

    /// Log at the given level if there is an error, preserving the original error type
    fn log_on_error_level<C>(self, level: Level, context: C) -> Self
    where
        C: Display + Send + Sync + 'static;
}

impl<T, E> LogOnError for Result<T, E>
where
    E: Debug,
{
    fn log_on_error<C>(self, context: C) -> Result<T, E>
    where
        C: Display + Send + Sync + 'static,
    {
        self.log_on_error_level(Level::ERROR, context)
    }

    fn log_on_error_level<C>(self, level: Level, context: C) -> Result<T, E>
    where
        C: Display + Send + Sync + 'static,
    {
        match self {
            Err(error) => {
                log_at_level(level, &format!("{context}: {error:?}"));
                Err(error)
            }
            _ => self,
        }
    }
}

fn log_at_level(level: Level, s: &str) {
    match level {
        Level::TRACE => tracing::trace!(s),
        Level::DEBUG => tracing::debug!(s),
        Level::INFO => tracing::info!(s),
        Level::WARN => tracing::warn!(s),
        Level::ERROR => tracing::error!(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_on_error_preserves_error() {
        let result: Result<(), &str> = Err("boom");
        assert_eq!(result.log_on_error_level(Level::WARN, "refresh"), Err("boom"));
    }
}
