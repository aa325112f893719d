//! The resumable machine: owns memory, registers and queues, and drives the step loop.
//!
//! A machine is `ready` after loading. [`Machine::run`] steps until the program halts or
//! needs input that is not queued; in the latter case the machine is `blocked` on the same
//! input instruction and resumes once [`Machine::input`] supplies a value. Any execution error
//! terminates the machine and is kept in [`Machine::error`].

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::config::MachineConfig;
use crate::disassembler::disassemble;
use crate::error::{MachineError, ParseError, Result};
use crate::instructions::base::{decode_modes, decode_opcode};
use crate::instructions::registry_instructions::get_registry;
use crate::memory::Memory;
use crate::parser::ProgramParser;
use crate::types::{InstructionContext, InstructionResult, Status, Word};

#[derive(Clone, Debug)]
pub struct Machine {
    program: Vec<Word>,
    memory: Memory,
    pointer: usize,
    previous_pointer: usize,
    relative_base: Word,
    input: VecDeque<Word>,
    output: VecDeque<Word>,
    status: Status,
    error: Option<MachineError>,
    last_opcode: Option<u8>,
    config: MachineConfig,
}

impl Machine {
    /// Parse `source` and load it.
    pub fn new(source: &str) -> std::result::Result<Self, ParseError> {
        let program = ProgramParser::new().parse_program(source)?;
        Ok(Self::from_words(program))
    }

    /// Load an already parsed program.
    #[must_use]
    pub fn from_words(program: Vec<Word>) -> Self {
        let mut machine = Self {
            program: Vec::new(),
            memory: Memory::new(),
            pointer: 0,
            previous_pointer: 0,
            relative_base: 0,
            input: VecDeque::new(),
            output: VecDeque::new(),
            status: Status::Ready,
            error: None,
            last_opcode: None,
            config: MachineConfig::default(),
        };
        machine.load_words(program);
        machine
    }

    #[must_use]
    pub fn with_config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the program and reset all execution state.
    pub fn load(&mut self, source: &str) -> std::result::Result<(), ParseError> {
        let program = ProgramParser::new().parse_program(source)?;
        self.load_words(program);
        Ok(())
    }

    pub fn load_words(&mut self, program: Vec<Word>) {
        self.program = program;
        self.reset();
    }

    /// Reload the current program: fresh memory image, pointer and relative base 0,
    /// empty queues, `ready`, no error.
    pub fn reset(&mut self) {
        self.memory.load(&self.program);
        self.pointer = 0;
        self.previous_pointer = 0;
        self.relative_base = 0;
        self.input.clear();
        self.output.clear();
        self.status = Status::Ready;
        self.error = None;
        self.last_opcode = None;
        debug!(cells = self.program.len(), "program loaded");
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Queue one input value. Wakes a blocked machine.
    pub fn input(&mut self, value: Word) -> Result<()> {
        if self.status == Status::Terminated {
            return Err(MachineError::InvalidState {
                operation: "input",
                status: self.status,
            });
        }
        self.input.push_back(value);
        if self.status == Status::Blocked {
            trace!(pointer = self.pointer, "input arrived, resuming");
            self.status = Status::Ready;
        }
        Ok(())
    }

    /// Queue several input values in order.
    pub fn input_all<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = Word>,
    {
        values.into_iter().try_for_each(|value| self.input(value))
    }

    // ------------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------------

    /// Execute exactly one instruction.
    pub fn step(&mut self) -> Result<()> {
        match self.status {
            Status::Ready => {}
            Status::Blocked => {
                return Err(self.fail(MachineError::InvalidState {
                    operation: "step",
                    status: Status::Blocked,
                }));
            }
            // Keep the recorded termination cause.
            Status::Terminated => {
                return Err(MachineError::InvalidState {
                    operation: "step",
                    status: Status::Terminated,
                });
            }
        }
        self.execute_instruction().map_err(|err| self.fail(err))
    }

    /// Step while `ready`. Returns the status it stopped in: `blocked` or `terminated`.
    pub fn run(&mut self) -> Result<Status> {
        while self.status == Status::Ready {
            self.step()?;
        }
        Ok(self.status)
    }

    fn execute_instruction(&mut self) -> Result<()> {
        let pointer = self.pointer;
        self.previous_pointer = pointer;

        let cell = self.memory.read_at(pointer)?;
        let opcode = decode_opcode(cell);
        let Some(handler) = get_registry().get_handler(opcode) else {
            return Err(MachineError::UnknownOpcode { opcode, pointer });
        };
        let modes = decode_modes(cell);
        self.last_opcode = Some(handler.opcode());
        trace!(
            pointer,
            instruction = handler.name(),
            ?modes,
            relative_base = self.relative_base,
            "step"
        );

        let mut context = InstructionContext {
            memory: &mut self.memory,
            pointer,
            relative_base: &mut self.relative_base,
            modes,
            input: &mut self.input,
            output: &mut self.output,
            config: self.config,
        };
        let next = pointer + 1 + handler.parameter_count();
        match handler.execute(&mut context)? {
            InstructionResult::Continue => self.advance(next),
            InstructionResult::Jump(target) => self.advance(target),
            InstructionResult::Block => {
                self.status = Status::Blocked;
                debug!(pointer, "blocked on input");
                Ok(())
            }
            InstructionResult::Halt => {
                self.pointer = next;
                self.status = Status::Terminated;
                self.error = None;
                debug!(pointer, outputs = self.output.len(), "halted");
                Ok(())
            }
        }
    }

    fn advance(&mut self, next: usize) -> Result<()> {
        self.pointer = next;
        if next == self.previous_pointer {
            return Err(MachineError::InfiniteLoop { pointer: next });
        }
        Ok(())
    }

    /// Terminate abnormally, recording `err`. Returns it for propagation.
    fn fail(&mut self, err: MachineError) -> MachineError {
        debug!(pointer = self.pointer, error = %err, "terminated abnormally");
        self.status = Status::Terminated;
        self.error = Some(err.clone());
        err
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Cause of abnormal termination, if any.
    #[must_use]
    pub fn error(&self) -> Option<&MachineError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn memory(&self) -> &[Word] {
        self.memory.as_slice()
    }

    /// Output not yet drained, oldest first.
    #[must_use]
    pub fn output(&self) -> &VecDeque<Word> {
        &self.output
    }

    #[must_use]
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    #[must_use]
    pub fn previous_pointer(&self) -> usize {
        self.previous_pointer
    }

    #[must_use]
    pub fn relative_base(&self) -> Word {
        self.relative_base
    }

    /// Inputs queued but not yet consumed, oldest first.
    #[must_use]
    pub fn pending_input(&self) -> &VecDeque<Word> {
        &self.input
    }

    #[must_use]
    pub fn last_opcode(&self) -> Option<u8> {
        self.last_opcode
    }

    #[must_use]
    pub fn config(&self) -> MachineConfig {
        self.config
    }

    // ------------------------------------------------------------------------
    // Output draining
    // ------------------------------------------------------------------------

    /// Remove and return the oldest output value.
    pub fn pop_output(&mut self) -> Option<Word> {
        self.output.pop_front()
    }

    /// Remove and return all output values in production order.
    pub fn drain_output(&mut self) -> Vec<Word> {
        self.output.drain(..).collect()
    }

    // ------------------------------------------------------------------------
    // Memory patching
    // ------------------------------------------------------------------------

    /// Read a cell without growing memory; zero past the end.
    pub fn peek(&self, address: Word) -> Result<Word> {
        Ok(self.memory.get(Memory::index(address)?))
    }

    /// Overwrite a cell, growing memory as needed. Failures leave the machine untouched.
    pub fn poke(&mut self, address: Word, value: Word) -> Result<()> {
        if self.status == Status::Terminated {
            return Err(MachineError::InvalidState {
                operation: "poke",
                status: self.status,
            });
        }
        self.memory.write(address, value)
    }

    /// Disassembly listing of current memory.
    #[must_use]
    pub fn disassemble(&self) -> Vec<(usize, String)> {
        disassemble(self.memory.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(source: &str) -> Machine {
        Machine::new(source).expect("test program parses")
    }

    #[test]
    fn add_and_multiply_example() {
        let mut m = machine("1,9,10,3,2,3,11,0,99,30,40,50");
        assert_eq!(m.run(), Ok(Status::Terminated));
        assert_eq!(m.memory(), &[3500, 9, 10, 70, 2, 3, 11, 0, 99, 30, 40, 50]);
        assert_eq!(m.error(), None);
    }

    #[test]
    fn input_before_run_is_echoed() {
        let mut m = machine("3,0,4,0,99");
        m.input(1).unwrap();
        assert_eq!(m.run(), Ok(Status::Terminated));
        assert_eq!(m.output(), &[1]);
    }

    #[test]
    fn blocks_until_input_arrives() {
        let mut m = machine("3,0,4,0,99");
        assert_eq!(m.run(), Ok(Status::Blocked));
        assert!(m.output().is_empty());
        assert_eq!(m.pointer(), 0, "blocked input instruction does not advance");

        m.input(1).unwrap();
        assert_eq!(m.status(), Status::Ready);
        assert_eq!(m.run(), Ok(Status::Terminated));
        assert_eq!(m.output(), &[1]);
        assert_eq!(m.error(), None);
    }

    #[test]
    fn run_on_blocked_machine_is_a_no_op() {
        let mut m = machine("3,0,99");
        assert_eq!(m.run(), Ok(Status::Blocked));
        assert_eq!(m.run(), Ok(Status::Blocked));
        assert_eq!(m.pointer(), 0);
    }

    #[test]
    fn immediate_mode_operands() {
        let mut m = machine("1002,4,3,4,33");
        assert_eq!(m.run(), Ok(Status::Terminated));
        assert_eq!(m.memory(), &[1002, 4, 3, 4, 99]);
    }

    #[test]
    fn large_products_are_exact() {
        let mut m = machine("1102,34915192,34915192,7,4,7,99,0");
        m.run().unwrap();
        assert_eq!(m.output(), &[1_219_070_632_396_864]);
    }

    #[test]
    fn relative_mode_quine() {
        let program = "109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99";
        let mut m = machine(program);
        assert_eq!(m.run(), Ok(Status::Terminated));
        let expected: Vec<Word> = program.split(',').map(|t| t.parse().unwrap()).collect();
        assert_eq!(m.output(), &expected);
    }

    #[test]
    fn comparisons_and_jumps() {
        // Outputs 999 below 8, 1000 at 8, 1001 above 8.
        let program = "3,21,1008,21,8,20,1005,20,22,107,8,21,20,1006,20,31,\
                       1106,0,36,98,0,0,1002,21,125,20,4,20,1105,1,46,104,\
                       999,1105,1,46,1101,1000,1,20,4,20,1105,1,46,98,99";
        for (input, expected) in [(7, 999), (8, 1000), (9, 1001)] {
            let mut m = machine(program);
            m.input(input).unwrap();
            assert_eq!(m.run(), Ok(Status::Terminated), "input {input}");
            assert_eq!(m.output(), &[expected], "input {input}");
        }
    }

    #[test]
    fn position_mode_equality() {
        for (input, expected) in [(8, 1), (5, 0)] {
            let mut m = machine("3,9,8,9,10,9,4,9,99,-1,8");
            m.input(input).unwrap();
            m.run().unwrap();
            assert_eq!(m.output(), &[expected]);
        }
    }

    #[test]
    fn arithmetic_only_touches_destination() {
        for source in ["1,5,6,7,99,3,4,0", "2,5,6,7,99,3,4,0", "7,5,6,7,99,3,4,0", "8,5,6,7,99,3,4,0"] {
            let mut m = machine(source);
            let before = m.memory().to_vec();
            m.step().unwrap();
            for (i, (old, new)) in before.iter().zip(m.memory()).enumerate() {
                if i != 7 {
                    assert_eq!(old, new, "{source}: cell {i} changed");
                }
            }
        }
    }

    #[test]
    fn self_jump_is_an_infinite_loop() {
        let mut m = machine("1105,1,0");
        assert_eq!(m.run(), Err(MachineError::InfiniteLoop { pointer: 0 }));
        assert_eq!(m.status(), Status::Terminated);
        assert_eq!(m.error(), Some(&MachineError::InfiniteLoop { pointer: 0 }));
    }

    #[test]
    fn jump_to_other_instruction_is_not_a_loop() {
        // 0: JZ 0, 3  ->  3: HALT
        let mut m = machine("1106,0,3,99");
        assert_eq!(m.run(), Ok(Status::Terminated));
    }

    #[test]
    fn untaken_jump_advances() {
        let mut m = machine("1105,0,0,99");
        m.step().unwrap();
        assert_eq!(m.pointer(), 3);
        assert_eq!(m.previous_pointer(), 0);
    }

    #[test]
    fn access_past_end_grows_memory() {
        // mem[20] = mem[10] + 5, then output mem[20].
        let mut m = machine("1001,10,5,20,4,20,99");
        assert_eq!(m.run(), Ok(Status::Terminated));
        assert_eq!(m.memory().len(), 21);
        assert_eq!(m.memory()[20], 5);
        assert_eq!(m.memory()[10], 0);
        assert_eq!(m.output(), &[5]);
    }

    #[test]
    fn negative_read_address_faults() {
        let mut m = machine("4,-1,99");
        assert_eq!(m.run(), Err(MachineError::InvalidAddress { address: -1 }));
        assert_eq!(m.status(), Status::Terminated);
    }

    #[test]
    fn negative_write_address_faults() {
        let mut m = machine("1101,1,1,-3,99");
        assert_eq!(m.run(), Err(MachineError::InvalidAddress { address: -3 }));
    }

    #[test]
    fn negative_relative_address_faults() {
        let mut m = machine("109,-5,204,0,99");
        assert_eq!(m.run(), Err(MachineError::InvalidAddress { address: -5 }));
    }

    #[test]
    fn negative_jump_target_faults() {
        let mut m = machine("1105,1,-7");
        assert_eq!(m.run(), Err(MachineError::InvalidAddress { address: -7 }));
    }

    #[test]
    fn unknown_opcode_terminates() {
        let mut m = machine("1101,1,1,5,42,0");
        assert_eq!(m.run(), Err(MachineError::UnknownOpcode { opcode: 42, pointer: 4 }));
        assert_eq!(m.status(), Status::Terminated);
        assert_eq!(m.memory()[5], 2, "work before the fault is kept");
    }

    #[test]
    fn empty_program_reads_zero_opcode() {
        let mut m = Machine::from_words(vec![]);
        assert_eq!(m.run(), Err(MachineError::UnknownOpcode { opcode: 0, pointer: 0 }));
    }

    #[test]
    fn unknown_mode_terminates() {
        let mut m = machine("304,0,99");
        assert_eq!(
            m.run(),
            Err(MachineError::UnknownMode {
                mode: 3,
                parameter: 0,
                pointer: 0
            })
        );
    }

    #[test]
    fn immediate_write_target_follows_config() {
        let mut lenient = machine("11101,2,3,6,99,0,0");
        assert_eq!(lenient.run(), Ok(Status::Terminated));
        assert_eq!(lenient.memory()[6], 5, "operand used as the address");

        let mut strict = machine("11101,2,3,6,99,0,0").with_config(MachineConfig::strict());
        assert_eq!(
            strict.run(),
            Err(MachineError::UnknownMode {
                mode: 1,
                parameter: 2,
                pointer: 0
            })
        );
        assert_eq!(strict.memory()[6], 0);
    }

    #[test]
    fn overflow_terminates() {
        let mut m = Machine::from_words(vec![1101, Word::MAX, 1, 0, 99]);
        assert_eq!(m.run(), Err(MachineError::ArithmeticOverflow { pointer: 0 }));
        let mut m = Machine::from_words(vec![109, Word::MAX, 109, 1, 99]);
        assert_eq!(m.run(), Err(MachineError::ArithmeticOverflow { pointer: 2 }));
    }

    #[test]
    fn stepping_terminated_machine_keeps_cause() {
        let mut m = machine("99");
        assert_eq!(m.run(), Ok(Status::Terminated));
        assert_eq!(
            m.step(),
            Err(MachineError::InvalidState {
                operation: "step",
                status: Status::Terminated
            })
        );
        assert_eq!(m.error(), None, "clean halt stays clean");
        assert_eq!(m.run(), Ok(Status::Terminated));
    }

    #[test]
    fn stepping_blocked_machine_terminates_it() {
        let mut m = machine("3,0,99");
        m.run().unwrap();
        let err = MachineError::InvalidState {
            operation: "step",
            status: Status::Blocked,
        };
        assert_eq!(m.step(), Err(err.clone()));
        assert_eq!(m.status(), Status::Terminated);
        assert_eq!(m.error(), Some(&err));
    }

    #[test]
    fn input_after_termination_is_rejected() {
        let mut m = machine("99");
        m.run().unwrap();
        assert_eq!(
            m.input(5),
            Err(MachineError::InvalidState {
                operation: "input",
                status: Status::Terminated
            })
        );
        assert!(m.pending_input().is_empty());
    }

    #[test]
    fn input_queue_is_fifo() {
        let mut m = machine("3,0,3,1,4,0,4,1,99");
        m.input_all([7, 8]).unwrap();
        assert_eq!(m.pending_input().len(), 2);
        m.run().unwrap();
        assert_eq!(m.output(), &[7, 8]);
        assert!(m.pending_input().is_empty());
    }

    #[test]
    fn inspection_is_idempotent() {
        let mut m = machine("1,0,0,0,3,0,99");
        m.step().unwrap();
        let snapshot = (m.status(), m.memory().to_vec(), m.output().clone(), m.pointer());
        for _ in 0..3 {
            assert_eq!(
                snapshot,
                (m.status(), m.memory().to_vec(), m.output().clone(), m.pointer())
            );
            let _ = m.peek(1000);
            let _ = m.disassemble();
        }
        assert_eq!(m.memory().len(), 7, "peek must not grow memory");
    }

    #[test]
    fn step_executes_one_instruction() {
        let mut m = machine("1101,2,3,0,4,0,99");
        m.step().unwrap();
        assert_eq!(m.memory()[0], 5);
        assert_eq!(m.pointer(), 4);
        assert_eq!(m.last_opcode(), Some(1));
        assert_eq!(m.status(), Status::Ready);
        m.step().unwrap();
        assert_eq!(m.output(), &[5]);
        m.step().unwrap();
        assert_eq!(m.status(), Status::Terminated);
        assert_eq!(m.last_opcode(), Some(99));
    }

    #[test]
    fn relative_base_accumulates() {
        let mut m = machine("109,10,209,-3,99,0,0,4");
        m.run().unwrap();
        assert_eq!(m.relative_base(), 14, "10 + mem[10 - 3]");
    }

    #[test]
    fn relative_input_target_blocks_then_writes() {
        let mut m = machine("109,10,203,-3,4,7,99,0");
        assert_eq!(m.run(), Ok(Status::Blocked));
        assert_eq!(m.pointer(), 2);
        m.input(42).unwrap();
        assert_eq!(m.run(), Ok(Status::Terminated));
        assert_eq!(m.output(), &[42]);
        assert_eq!(m.memory()[7], 42, "written at rb 10 + -3");
    }

    #[test]
    fn relative_arithmetic_target() {
        let mut m = machine("109,2,21101,3,4,5,4,7,99");
        assert_eq!(m.run(), Ok(Status::Terminated));
        assert_eq!(m.output(), &[7]);
        assert_eq!(m.memory()[7], 7, "3 + 4 stored at rb 2 + 5");
    }

    #[test]
    fn output_can_be_drained() {
        let mut m = machine("104,1,104,2,104,3,99");
        m.run().unwrap();
        assert_eq!(m.pop_output(), Some(1));
        assert_eq!(m.drain_output(), vec![2, 3]);
        assert_eq!(m.pop_output(), None);
        assert!(m.output().is_empty());
    }

    #[test]
    fn reset_reloads_program() {
        let mut m = machine("1,0,0,0,99");
        m.run().unwrap();
        assert_eq!(m.memory()[0], 2);
        m.reset();
        assert_eq!(m.memory(), &[1, 0, 0, 0, 99]);
        assert_eq!(m.status(), Status::Ready);
        assert_eq!(m.pointer(), 0);
        assert_eq!(m.error(), None);
    }

    #[test]
    fn load_replaces_program() {
        let mut m = machine("4,0,99");
        m.run().unwrap();
        m.load("104,9,99").unwrap();
        assert!(m.output().is_empty());
        m.run().unwrap();
        assert_eq!(m.output(), &[9]);
        assert!(m.load("1,,2").is_err());
    }

    #[test]
    fn poke_patches_memory_before_run() {
        let mut m = machine("1,0,0,0,99,0,0");
        m.poke(1, 5).unwrap();
        m.poke(2, 6).unwrap();
        m.run().unwrap();
        assert_eq!(m.peek(0), Ok(0), "mem[5] + mem[6] with both zero");
        assert_eq!(m.peek(-1), Err(MachineError::InvalidAddress { address: -1 }));
        assert!(m.poke(0, 1).is_err(), "terminated machine rejects poke");
    }

    #[test]
    fn machines_wired_in_lockstep() {
        // Each machine adds one to its input and outputs it, twice.
        let program = "3,20,1001,20,1,20,4,20,3,20,1001,20,1,20,4,20,99";
        let mut a = machine(program);
        let mut b = machine(program);
        let mut value = 0;
        while a.status() != Status::Terminated || b.status() != Status::Terminated {
            a.input(value).unwrap();
            a.run().unwrap();
            for v in a.drain_output() {
                b.input(v).unwrap();
            }
            b.run().unwrap();
            value = b.drain_output().into_iter().last().unwrap_or(value);
        }
        assert_eq!(value, 4);
    }

    #[test]
    fn clone_forks_execution() {
        let mut base = machine("3,0,4,0,99");
        base.run().unwrap();
        let mut fork = base.clone();
        fork.input(5).unwrap();
        fork.run().unwrap();
        base.input(6).unwrap();
        base.run().unwrap();
        assert_eq!(fork.output(), &[5]);
        assert_eq!(base.output(), &[6]);
    }
}
