use std::{
    io,
    sync::{Arc, Mutex},
};

use coolhatd::device::{Register, RegisterBus};

// Bus double recording every transaction it is asked to send
#[derive(Clone, Default)]
pub struct RecordingBus {
    transactions: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RecordingBus {
    pub fn transactions(&self) -> Vec<Vec<u8>> {
        self.transactions.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn writes_to(&self, register: Register) -> Vec<u8> {
        self.transactions()
            .into_iter()
            .filter(|tx| tx[0] == register.address())
            .map(|tx| tx[1])
            .collect()
    }
}

impl RegisterBus for RecordingBus {
    fn write_bytes(&mut self, bytes: &[u8; 2]) -> io::Result<usize> {
        self.transactions.lock().unwrap().push(bytes.to_vec());
        Ok(bytes.len())
    }
}
