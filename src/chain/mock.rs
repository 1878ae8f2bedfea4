//! In-memory chain for unit tests

use async_trait::async_trait;
use ethers::abi::{Abi, Token};
use ethers::types::{Address, Bytes, TransactionRequest, H256};
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ChainClient, ChainError, TxReceipt};

#[derive(Default)]
pub struct MockChain {
    block_number: Mutex<u64>,
    block_number_error: Mutex<Option<String>>,
    calls: Mutex<HashMap<(Address, Vec<u8>), Result<Bytes, String>>>,
    code: Mutex<HashMap<Address, Bytes>>,
    accounts: Vec<Address>,
    sent: Mutex<Vec<TransactionRequest>>,
    revert_sends: bool,
}

impl MockChain {
    pub fn new(block_number: u64) -> Self {
        Self {
            block_number: Mutex::new(block_number),
            accounts: vec![Address::from_low_u64_be(0xacc)],
            ..Default::default()
        }
    }

    /// Every sent transaction is mined with a failed status
    pub fn reverting(mut self) -> Self {
        self.revert_sends = true;
        self
    }

    pub fn set_block_number(&self, number: u64) {
        *self.block_number.lock().unwrap() = number;
    }

    /// Make `eth_blockNumber` fail as if the node were unreachable
    pub fn fail_block_number(&self, message: &str) {
        *self.block_number_error.lock().unwrap() = Some(message.to_string());
    }

    /// Answer `abi.name(args)` on `to` with the encoded `outputs`
    pub fn respond(&self, to: Address, abi: &Abi, name: &str, args: &[Token], outputs: &[Token]) {
        let input = abi.function(name).unwrap().encode_input(args).unwrap();
        let output = ethers::abi::encode(outputs);
        self.calls
            .lock()
            .unwrap()
            .insert((to, input), Ok(output.into()));
    }

    /// Make `abi.name(args)` on `to` fail with `message`
    pub fn fail(&self, to: Address, abi: &Abi, name: &str, args: &[Token], message: &str) {
        let input = abi.function(name).unwrap().encode_input(args).unwrap();
        self.calls
            .lock()
            .unwrap()
            .insert((to, input), Err(message.to_string()));
    }

    pub fn set_code(&self, address: Address, code: Vec<u8>) {
        self.code.lock().unwrap().insert(address, code.into());
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn block_number(&self) -> Result<u64, ChainError> {
        if let Some(message) = self.block_number_error.lock().unwrap().clone() {
            return Err(ChainError::Unavailable(message));
        }
        Ok(*self.block_number.lock().unwrap())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        match self.calls.lock().unwrap().get(&(to, data.to_vec())) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(ChainError::Rpc(message.clone())),
            None => Err(ChainError::Rpc("execution reverted".to_string())),
        }
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        Ok(self
            .code
            .lock()
            .unwrap()
            .get(&address)
            .cloned()
            .unwrap_or_default())
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        Ok(self.accounts.clone())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<H256, ChainError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(tx);
        Ok(H256::from_low_u64_be(sent.len() as u64))
    }

    async fn wait_for_receipt(&self, tx_hash: H256) -> Result<TxReceipt, ChainError> {
        let index = tx_hash.to_low_u64_be();
        let contract_address = self
            .sent
            .lock()
            .unwrap()
            .get(index as usize - 1)
            .and_then(|tx| tx.to.is_none().then(|| Address::from_low_u64_be(0xc000 + index)));

        Ok(TxReceipt {
            tx_hash,
            contract_address,
            success: !self.revert_sends,
            block_number: Some(*self.block_number.lock().unwrap()),
        })
    }
}
