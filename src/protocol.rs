//! Host control protocol for the SIC1 machine.
//!
//! Models the bring-up control surface at the protocol level, not the pin
//! level: the bit-banged `set_pc` / `load_data` / `run` pulses of the real
//! device become a tagged [`Command`] stream, and the output strobe / halted
//! status lines become [`Event`]s. The protocol layer owns what the machine
//! core does not: the single-slot input latch and the output byte queue.

use tracing::{debug, trace};

use crate::error::ProtocolError;
use crate::machine::{MEMORY_SIZE, MachineCore, RunState};

/// One control pulse on the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Set the program counter.
    SetPc(u8),
    /// Store one byte at the current program counter, then advance it by
    /// one. The device auto-increments, so a bulk load is one `SetPc`
    /// followed by a stream of these.
    LoadByte(u8),
    /// Execute one instruction.
    Run,
}

/// Status reported back to the host after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The instruction stored to the output port; carries the byte.
    OutputStrobe(u8),
    /// The machine is halted (either this instruction halted it, or it
    /// already was and the run pulse did nothing).
    Halted,
}

/// The host-facing control surface over one [`MachineCore`].
///
/// Single-threaded and fully synchronous; each instance is self-contained,
/// so independent machines can run in parallel tests without shared state.
#[derive(Debug, Clone, Default)]
pub struct ControlProtocol {
    core: MachineCore,
    /// Last-write-wins input latch, cleared by the step that reads it.
    input: Option<u8>,
    output: Vec<u8>,
    /// Whether any set-pc happened since reset; loads before that are
    /// rejected rather than silently applied at address 0.
    pc_set: bool,
}

impl ControlProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the machine, the output queue, and any pending input.
    /// Idempotent.
    pub fn reset(&mut self) {
        self.core.reset();
        self.input = None;
        self.output.clear();
        self.pc_set = false;
    }

    pub fn core(&self) -> &MachineCore {
        &self.core
    }

    pub fn halted(&self) -> bool {
        self.core.is_halted()
    }

    pub fn run_state(&self) -> RunState {
        self.core.run_state()
    }

    /// Consume one control pulse, reporting any status edge it produced.
    pub fn apply(&mut self, command: Command) -> Result<Option<Event>, ProtocolError> {
        match command {
            Command::SetPc(addr) => {
                self.set_program_counter(addr);
                Ok(None)
            }
            Command::LoadByte(value) => {
                if !self.pc_set {
                    return Err(ProtocolError::ProtocolSequence);
                }
                self.load_at_pc(value);
                Ok(None)
            }
            Command::Run => {
                if self.core.is_halted() {
                    return Ok(Some(Event::Halted));
                }
                Ok(self.step_once())
            }
        }
    }

    pub fn set_program_counter(&mut self, addr: u8) {
        self.core.set_program_counter(addr);
        self.pc_set = true;
    }

    /// Latch a byte for the next operand read of the input port. Single
    /// slot, last write wins; reads yield 0 when nothing is latched.
    pub fn set_input(&mut self, byte: u8) {
        self.input = Some(byte);
    }

    /// Poke one byte: set-pc then a single load pulse.
    pub fn write_memory_byte(&mut self, addr: u8, value: u8) {
        self.set_program_counter(addr);
        self.load_at_pc(value);
    }

    /// Bulk load a flat image at `addr`, auto-incrementing through memory.
    ///
    /// Rejected whole (memory and program counter untouched) when the image
    /// would run past address 255. On success the program counter sits one
    /// past the last byte, as on the real device; callers re-issue
    /// [`set_program_counter`](Self::set_program_counter) before running.
    pub fn write_memory_bytes(&mut self, addr: u8, bytes: &[u8]) -> Result<(), ProtocolError> {
        if addr as usize + bytes.len() > MEMORY_SIZE {
            return Err(ProtocolError::AddressRange {
                base: addr,
                len: bytes.len(),
            });
        }
        self.set_program_counter(addr);
        for &byte in bytes {
            self.load_at_pc(byte);
        }
        debug!(base = addr, len = bytes.len(), "loaded image");
        Ok(())
    }

    /// Execute up to `n` instructions, stopping early without error on
    /// halt. Returns the number actually executed.
    pub fn step(&mut self, n: usize) -> usize {
        let mut executed = 0;
        while executed < n && !self.core.is_halted() {
            self.step_once();
            executed += 1;
        }
        executed
    }

    /// Run until the machine halts, or fail with
    /// [`ProtocolError::ExecutionTimeout`] once `max_steps` instructions
    /// have executed without a halt. An unbounded run never times out.
    pub fn run_until_halt(&mut self, max_steps: Option<usize>) -> Result<usize, ProtocolError> {
        let mut executed = 0;
        while !self.core.is_halted() {
            if let Some(bound) = max_steps {
                if executed >= bound {
                    return Err(ProtocolError::ExecutionTimeout { max_steps: bound });
                }
            }
            self.step_once();
            executed += 1;
        }
        debug!(executed, "machine halted");
        Ok(executed)
    }

    /// The output queue so far, oldest byte first. Non-destructive; the
    /// queue is emptied only by [`clear_output`](Self::clear_output) or
    /// [`reset`](Self::reset).
    pub fn drain_output(&self) -> &[u8] {
        &self.output
    }

    /// The output queue decoded one byte per character, for programs that
    /// emit text.
    pub fn peek_output_string(&self) -> String {
        self.output.iter().map(|&b| b as char).collect()
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    fn load_at_pc(&mut self, value: u8) {
        let pc = self.core.pc();
        self.core.load_byte(pc, value);
        self.core.set_program_counter(pc.wrapping_add(1));
    }

    fn step_once(&mut self) -> Option<Event> {
        let effect = self.core.step(self.input.unwrap_or(0));
        if effect.input_consumed {
            self.input = None;
        }
        if let Some(byte) = effect.output {
            trace!(byte, "output strobe");
            self.output.push(byte);
            return Some(Event::OutputStrobe(byte));
        }
        if self.core.is_halted() {
            debug!(pc = self.core.pc(), "halt");
            return Some(Event::Halted);
        }
        None
    }
}
