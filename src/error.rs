use thiserror::Error;

/// Recoverable failures of the host control protocol.
///
/// The machine core itself never errors: every 8-bit address is well formed
/// and all arithmetic wraps by design. These cover the host-facing surface
/// only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A bulk load would run past the end of the 256-byte memory. The load
    /// is rejected before any byte lands.
    #[error("load of {len} bytes at base {base:#04x} runs past the end of memory")]
    AddressRange { base: u8, len: usize },

    /// A bounded run exhausted its step budget before the machine halted.
    #[error("machine did not halt within {max_steps} instructions")]
    ExecutionTimeout { max_steps: usize },

    /// A load command was issued before any set-pc since reset.
    #[error("load issued before the program counter was set")]
    ProtocolSequence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProtocolError::AddressRange { base: 0xfa, len: 7 };
        assert_eq!(
            err.to_string(),
            "load of 7 bytes at base 0xfa runs past the end of memory"
        );
        let err = ProtocolError::ExecutionTimeout { max_steps: 10 };
        assert_eq!(err.to_string(), "machine did not halt within 10 instructions");
    }
}
