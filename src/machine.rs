//! The SIC1 machine core: a single-instruction computer over 256 bytes of
//! memory.
//!
//! The only instruction is subtract-compare-branch. Each instruction is three
//! consecutive memory cells at the program counter, `(a, b, c)`, executing
//! (in C-like syntax):
//!
//!   mem[a] = mem[a] - mem[b]; if (mem[a] <= 0) { goto c; } else { goto pc + 3; }
//!
//! Cells are 8-bit two's complement: subtraction wraps and the `<= 0`
//! comparison interprets the result as signed (i8). The program counter and
//! the +3 advance wrap modulo 256.
//!
//! Three addresses are reserved as I/O ports. Reading address 253 as a data
//! operand yields the host-latched input byte instead of the cell. Storing to
//! address 254 emits one output byte; the port is write-only, so the cell
//! behind it keeps whatever was last loaded into it. Storing to address 255
//! halts the machine permanently until reset. Accesses to these addresses
//! during instruction *fetch* are ordinary memory reads with no port effect.

pub const MEMORY_SIZE: usize = 256;

/// The three memory addresses whose data accesses carry I/O side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReservedAddress {
    /// Reads yield the host-latched input byte.
    Input = 253,
    /// Stores emit one byte on the output port.
    Output = 254,
    /// Stores halt the machine.
    Halt = 255,
}

pub const ADDR_IN: u8 = ReservedAddress::Input as u8;
pub const ADDR_OUT: u8 = ReservedAddress::Output as u8;
pub const ADDR_HALT: u8 = ReservedAddress::Halt as u8;

impl ReservedAddress {
    pub fn from_addr(addr: u8) -> Option<Self> {
        match addr {
            ADDR_IN => Some(Self::Input),
            ADDR_OUT => Some(Self::Output),
            ADDR_HALT => Some(Self::Halt),
            _ => None,
        }
    }
}

/// Whether the machine may execute further instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Ready,
    /// Permanent until `reset`.
    Halted,
}

/// Side effects of one `step`, reported to whoever owns the input latch and
/// the output queue (the machine core owns neither).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepEffect {
    /// At least one operand read hit the input port.
    pub input_consumed: bool,
    /// Byte emitted on the output port, if the instruction stored to it.
    pub output: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct MachineCore {
    memory: [u8; MEMORY_SIZE],
    pc: u8,
    state: RunState,
}

impl Default for MachineCore {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineCore {
    pub fn new() -> Self {
        Self {
            memory: [0; MEMORY_SIZE],
            pc: 0,
            state: RunState::Ready,
        }
    }

    /// Zero all memory, set the program counter to 0, and make the machine
    /// ready again. Output is owned by the protocol layer and is untouched.
    pub fn reset(&mut self) {
        self.memory = [0; MEMORY_SIZE];
        self.pc = 0;
        self.state = RunState::Ready;
    }

    /// Poke a byte directly into memory, bypassing all port side effects.
    /// Valid in any run state; used for program/data installation.
    pub fn load_byte(&mut self, addr: u8, value: u8) {
        self.memory[addr as usize] = value;
    }

    pub fn set_program_counter(&mut self, addr: u8) {
        self.pc = addr;
    }

    pub fn pc(&self) -> u8 {
        self.pc
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    pub fn memory(&self) -> &[u8; MEMORY_SIZE] {
        &self.memory
    }

    pub fn read_byte(&self, addr: u8) -> u8 {
        self.memory[addr as usize]
    }

    /// Execute exactly one instruction, or nothing at all when halted.
    ///
    /// `input` is the byte the host holds on the input port for the duration
    /// of this step; both operand reads of address 253 within one instruction
    /// see the same value (single latch, not a stream).
    pub fn step(&mut self, input: u8) -> StepEffect {
        if self.state == RunState::Halted {
            return StepEffect::default();
        }

        // Fetch is three plain memory reads; reserved addresses are only
        // special when accessed *through* an operand field.
        let pc = self.pc;
        let a = self.memory[pc as usize];
        let b = self.memory[pc.wrapping_add(1) as usize];
        let c = self.memory[pc.wrapping_add(2) as usize];

        let va = self.operand_read(a, input);
        let vb = self.operand_read(b, input);
        let result = va.wrapping_sub(vb);

        let mut effect = StepEffect {
            input_consumed: a == ADDR_IN || b == ADDR_IN,
            output: None,
        };

        match ReservedAddress::from_addr(a) {
            Some(ReservedAddress::Output) => {
                // The output port is write-only: the byte goes out on the
                // port and the cell behind 254 keeps its loaded value.
                effect.output = Some(result);
            }
            Some(ReservedAddress::Halt) => {
                self.memory[a as usize] = result;
                self.state = RunState::Halted;
            }
            _ => {
                self.memory[a as usize] = result;
            }
        }

        // A halting instruction leaves the program counter where it was.
        if self.state == RunState::Ready {
            self.pc = if (result as i8) <= 0 {
                c
            } else {
                pc.wrapping_add(3)
            };
        }

        effect
    }

    fn operand_read(&self, addr: u8, input: u8) -> u8 {
        if addr == ADDR_IN {
            input
        } else {
            self.memory[addr as usize]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Install a flat image starting at `base`.
    fn load(core: &mut MachineCore, base: u8, image: &[u8]) {
        for (i, &byte) in image.iter().enumerate() {
            core.load_byte(base.wrapping_add(i as u8), byte);
        }
    }

    #[test]
    fn test_subtract_stores_result() {
        // Instruction (3, 4, 99): mem[3] -= mem[4] => 10 - 3 = 7.
        // 7 > 0 => pc advances to 3.
        let mut core = MachineCore::new();
        load(&mut core, 0, &[3, 4, 99, 10, 3]);
        core.step(0);
        assert_eq!(core.read_byte(3), 7);
        assert_eq!(core.pc(), 3);
    }

    #[test]
    fn test_branch_on_zero() {
        // mem[3] = 5 - 5 = 0. 0 <= 0 => pc = c = 40.
        let mut core = MachineCore::new();
        load(&mut core, 0, &[3, 4, 40, 5, 5]);
        core.step(0);
        assert_eq!(core.read_byte(3), 0);
        assert_eq!(core.pc(), 40);
    }

    #[test]
    fn test_branch_on_negative() {
        // mem[3] = 2 - 5 = 253 (wrapping). 253 as i8 = -3 <= 0 => pc = 40.
        let mut core = MachineCore::new();
        load(&mut core, 0, &[3, 4, 40, 2, 5]);
        core.step(0);
        assert_eq!(core.read_byte(3), 253);
        assert_eq!(core.pc(), 40);
    }

    #[test]
    fn test_no_branch_on_positive() {
        let mut core = MachineCore::new();
        load(&mut core, 0, &[3, 4, 40, 9, 2]);
        core.step(0);
        assert_eq!(core.read_byte(3), 7);
        assert_eq!(core.pc(), 3);
    }

    #[test]
    fn test_signed_wraparound_subtraction() {
        // -120 - 100 wraps: 0x88 - 0x64 = 0x24 = 36, positive, so no branch.
        let mut core = MachineCore::new();
        load(&mut core, 0, &[3, 4, 40, 0x88, 100]);
        core.step(0);
        assert_eq!(core.read_byte(3), 0x24);
        assert_eq!(core.pc(), 3);
    }

    #[test]
    fn test_fetch_and_advance_wrap_around_memory_end() {
        // Instruction fetched from 255, 0, 1: a = mem[255] = 5, b = mem[0] = 6,
        // c = mem[1] = 7. mem[5] = 10 - 3 = 7 > 0 => pc = 255 + 3 = 2 (wraps).
        let mut core = MachineCore::new();
        core.load_byte(255, 5);
        core.load_byte(0, 6);
        core.load_byte(1, 7);
        core.load_byte(5, 10);
        core.load_byte(6, 3);
        core.set_program_counter(255);
        core.step(0);
        assert_eq!(core.read_byte(5), 7);
        assert_eq!(core.pc(), 2);
    }

    #[test]
    fn test_store_to_halt_address_stops_machine() {
        // Instruction (255, 255, 255): mem[255] = 0xff - 0xff... both reads
        // see the loaded 0xff, result 0. Store lands, machine halts, pc
        // stays on the halting instruction.
        let mut core = MachineCore::new();
        core.load_byte(255, 0xff);
        core.load_byte(0, 255);
        core.load_byte(1, 255);
        core.load_byte(2, 255);
        let effect = core.step(0);
        assert!(core.is_halted());
        assert_eq!(core.run_state(), RunState::Halted);
        assert_eq!(core.pc(), 0);
        assert_eq!(core.read_byte(255), 0);
        assert_eq!(effect.output, None);
    }

    #[test]
    fn test_halted_machine_does_not_execute() {
        let mut core = MachineCore::new();
        core.load_byte(0, 255);
        core.step(0);
        assert!(core.is_halted());

        // Memory and pc must be frozen from here on.
        let before = *core.memory();
        let effect = core.step(0);
        assert_eq!(effect, StepEffect::default());
        assert_eq!(core.memory(), &before);
        assert_eq!(core.pc(), 0);
    }

    #[test]
    fn test_reset_returns_to_ready() {
        let mut core = MachineCore::new();
        core.load_byte(0, 255);
        core.step(0);
        assert!(core.is_halted());

        core.reset();
        assert_eq!(core.run_state(), RunState::Ready);
        assert_eq!(core.pc(), 0);
        assert!(core.memory().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_store_to_output_emits_byte_without_touching_memory() {
        // Instruction (254, 4, 0): port gets mem[254] - mem[4] = 0 - 1 = 0xff,
        // while the cell behind 254 keeps its loaded value.
        let mut core = MachineCore::new();
        load(&mut core, 0, &[254, 4, 0, 0, 1]);
        let effect = core.step(0);
        assert_eq!(effect.output, Some(0xff));
        assert_eq!(core.read_byte(254), 0);
        assert!(!core.is_halted());
    }

    #[test]
    fn test_read_of_output_cell_yields_loaded_value() {
        // mem[3] = mem[254] - mem[4] with 0x30 loaded at 254: 0x30 - 0x10.
        let mut core = MachineCore::new();
        load(&mut core, 0, &[3, 254, 99]);
        core.load_byte(254, 0x30);
        core.load_byte(3, 0x50);
        core.step(0);
        assert_eq!(core.read_byte(3), 0x20);
    }

    #[test]
    fn test_input_operand_reads_latched_byte() {
        // Echo-negate probe from the original basic I/O test:
        // (254, 253, 0x10) with input 15 => port byte = 0 - 15 = 0xf1 (-15).
        let mut core = MachineCore::new();
        load(&mut core, 0, &[ADDR_OUT, ADDR_IN, 0x10]);
        let effect = core.step(15);
        assert_eq!(effect.output, Some(0xf1));
        assert!(effect.input_consumed);
        // Result -15 <= 0, so the branch to 0x10 is taken.
        assert_eq!(core.pc(), 0x10);
    }

    #[test]
    fn test_both_operands_on_input_port_see_same_latch() {
        // (253, 253, 9): both reads yield the same latched 42, so the store
        // to cell 253 is 0 and the branch is taken.
        let mut core = MachineCore::new();
        load(&mut core, 0, &[ADDR_IN, ADDR_IN, 9]);
        let effect = core.step(42);
        assert!(effect.input_consumed);
        assert_eq!(core.read_byte(ADDR_IN), 0);
        assert_eq!(core.pc(), 9);
    }

    #[test]
    fn test_store_to_input_cell_is_plain_store() {
        // Writing cell 253 has no side effect; only reads through it do.
        let mut core = MachineCore::new();
        load(&mut core, 0, &[ADDR_IN, 4, 9, 0, 5]);
        let effect = core.step(0);
        assert!(effect.input_consumed); // operand a was read through 253
        assert_eq!(core.read_byte(ADDR_IN), 251); // 0 - 5 wrapping
        assert_eq!(effect.output, None);
    }

    #[test]
    fn test_reserved_address_mapping() {
        assert_eq!(ReservedAddress::from_addr(253), Some(ReservedAddress::Input));
        assert_eq!(ReservedAddress::from_addr(254), Some(ReservedAddress::Output));
        assert_eq!(ReservedAddress::from_addr(255), Some(ReservedAddress::Halt));
        assert_eq!(ReservedAddress::from_addr(0), None);
        assert_eq!(ReservedAddress::from_addr(252), None);
    }
}
