//! NAPI class exposing the machine to Node with the same surface as the JS machine.

use napi::bindgen_prelude::*;
use napi_derive::napi;

use crate::machine::Machine;
use crate::types::Word;

fn to_napi_error(err: impl std::fmt::Display) -> Error {
    Error::from_reason(err.to_string())
}

/// Words cross as BigInt; i64 would become Number and lose precision above 2^53.
fn word_from_bigint(value: &BigInt) -> Result<Word> {
    let (word, lossless) = value.get_i64();
    if !lossless {
        return Err(Error::from_reason("input value does not fit in a 64-bit word"));
    }
    Ok(word)
}

fn words_to_bigints<'a>(words: impl IntoIterator<Item = &'a Word>) -> Vec<BigInt> {
    words.into_iter().map(|&word| BigInt::from(word)).collect()
}

#[napi(js_name = "IntcodeMachine")]
pub struct IntcodeMachine {
    inner: Machine,
}

#[napi]
impl IntcodeMachine {
    #[napi(constructor)]
    pub fn new(program: String) -> Result<Self> {
        let inner = Machine::new(&program).map_err(to_napi_error)?;
        Ok(Self { inner })
    }

    #[napi]
    pub fn load(&mut self, program: String) -> Result<()> {
        self.inner.load(&program).map_err(to_napi_error)
    }

    #[napi]
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[napi]
    pub fn input(&mut self, value: BigInt) -> Result<()> {
        let word = word_from_bigint(&value)?;
        self.inner.input(word).map_err(to_napi_error)
    }

    #[napi]
    pub fn step(&mut self) -> Result<()> {
        self.inner.step().map_err(to_napi_error)
    }

    /// Returns the status the machine stopped in.
    #[napi]
    pub fn run(&mut self) -> Result<String> {
        let status = self.inner.run().map_err(to_napi_error)?;
        Ok(status.as_str().to_string())
    }

    #[napi]
    pub fn drain_output(&mut self) -> Vec<BigInt> {
        words_to_bigints(&self.inner.drain_output())
    }

    #[napi(getter)]
    pub fn memory(&self) -> Vec<BigInt> {
        words_to_bigints(self.inner.memory())
    }

    #[napi(getter)]
    pub fn output(&self) -> Vec<BigInt> {
        words_to_bigints(self.inner.output())
    }

    #[napi(getter)]
    pub fn status(&self) -> String {
        self.inner.status().as_str().to_string()
    }

    #[napi(getter)]
    pub fn error(&self) -> Option<String> {
        self.inner.error().map(ToString::to_string)
    }
}
