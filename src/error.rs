//! Erros do adapter.

use crate::core::CoreError;

/// Erros das operações do adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterError {
    /// `init` ainda não foi chamado
    NotInitialized,
    /// Nenhuma ROM foi alocada pelo host
    NoRom,
    /// Nenhum jogo montado
    NoGameLoaded,
    /// Nenhum save state no buffer
    NoState,
    /// Falha de alocação
    OutOfMemory { what: &'static str, size: usize },
    /// O loader do core rejeitou a mídia
    MediaLoad(CoreError),
    /// Falha reportada pelo core
    Core(CoreError),
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterError::NotInitialized => write!(f, "emulator not initialized"),
            AdapterError::NoRom => write!(f, "no ROM buffer"),
            AdapterError::NoGameLoaded => write!(f, "no game loaded"),
            AdapterError::NoState => write!(f, "no save state in buffer"),
            AdapterError::OutOfMemory { what, size } => {
                write!(f, "out of memory allocating {} ({} bytes)", what, size)
            }
            AdapterError::MediaLoad(e) => write!(f, "media load failed: {}", e),
            AdapterError::Core(e) => write!(f, "core error: {}", e),
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdapterError::MediaLoad(e) | AdapterError::Core(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoreError> for AdapterError {
    fn from(e: CoreError) -> Self {
        AdapterError::Core(e)
    }
}

/// Tipo de resultado para operações do adapter
pub type AdapterResult<T> = Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_and_source() {
        let err = AdapterError::MediaLoad(CoreError::BadDetect);
        assert_eq!(err.to_string(), "media load failed: media type not detected");
        assert!(err.source().is_some());
        assert!(AdapterError::NoRom.source().is_none());

        let err: AdapterError = CoreError::State(-1).into();
        assert_eq!(err, AdapterError::Core(CoreError::State(-1)));
    }
}
