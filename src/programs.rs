//! Program images shipped with the original bring-up and test material.
//!
//! Flat byte arrays, addresses implied by position from a caller-chosen base
//! (no header, no length prefix, no checksum). All of them load at base 0.

/// Three-byte basic I/O probe: `OUT <- mem[254] - IN`, then branch to 0x10.
///
/// With 0 loaded behind the output port and an input byte latched, a single
/// step emits the negated input (15 in => 0xf1 out).
pub const ECHO_NEGATE: [u8; 3] = [0xfe, 0xfd, 0x10];

/// Branch-and-halt probe.
///
/// The first instruction subtracts cell 0 from itself and branches over the
/// dead instruction at 3 straight to 6; that one emits
/// `mem[254] - mem[9] = 0 - (-1) = 1` on the output port; the trailing
/// all-0xff triple then stores to 255 and halts. Output queue: `[0x01]`.
#[rustfmt::skip]
pub const BRANCHING_PROBE: [u8; 12] = [
    0x00, 0x00, 0x06, // cell 0 <- 0, goto 6
    0xfe, 0x00, 0x00, // dead: never reached
    0xfe, 0x09, 0x00, // OUT <- 0 - mem[9] = 1
    0xff, 0xff, 0xff, // data for the previous instruction + halt
];

/// Prints `Hello, Tiny Tapeout!` one character per loop pass, emits the
/// terminating NUL, then halts. Source: programs/print_hello_tinytapeout.sic1.
#[rustfmt::skip]
pub const PRINT_HELLO_TINYTAPEOUT: [u8; 58] = [
    0x21, 0x22, 0x03, 0x16, 0x16, 0x06, 0x16, 0x21, 0x09, 0x12, 0x12, 0x0c, 0x12, 0x21, 0x0f, 0x21,
    0x21, 0x12, 0x21, 0x23, 0xff, 0x21, 0x00, 0x18, 0xfe, 0x21, 0x1b, 0x22, 0x24, 0x1e, 0x21, 0x21,
    0x00, 0x00, 0x25, 0x00, 0xff, 0x48, 0x65, 0x6c, 0x6c, 0x6f, 0x2c, 0x20, 0x54, 0x69, 0x6e, 0x79,
    0x20, 0x54, 0x61, 0x70, 0x65, 0x6f, 0x75, 0x74, 0x21, 0x00,
];

/// Free-running counter that cycles the sixteen 7-segment digit patterns
/// (0x3f, 0x06, 0x5b, ...) on the output port forever; it never halts.
/// Source: programs/count_7segment.sic1.
#[rustfmt::skip]
pub const COUNT_7SEGMENT: [u8; 68] = [
    0x2d, 0x42, 0x03, 0x2e, 0x2e, 0x06, 0x2e, 0x2d, 0x09, 0x2d, 0x2d, 0x0c, 0x2d, 0x2e, 0x0f, 0x22,
    0x22, 0x12, 0x22, 0x2d, 0x15, 0x1e, 0x1e, 0x18, 0x1e, 0x2d, 0x1b, 0x2d, 0x2d, 0x1e, 0x2d, 0x2f,
    0x00, 0x2d, 0x00, 0x24, 0xfe, 0x2d, 0x27, 0x2e, 0x30, 0x2a, 0x2d, 0x2d, 0x0c, 0x00, 0x00, 0x00,
    0xff, 0x3f, 0x06, 0x5b, 0x4f, 0x66, 0x6d, 0x7d, 0x07, 0x7f, 0x6f, 0x77, 0x7c, 0x39, 0x5e, 0x79,
    0x71, 0x00, 0x31, 0x00,
];
