pub mod channel;
pub mod clients;
pub mod commitment;
pub mod staking;

use std::fmt::Debug;

use ibc_query_client::error::QueryError;

use crate::chain::MockChain;

pub enum Expect {
    Success,
    /// Fails, optionally with an error displaying exactly like the given one.
    Failure(Option<QueryError>),
}

impl Expect {
    pub fn matches<T>(&self, res: &Result<T, QueryError>) -> bool {
        match (self, res) {
            (Expect::Success, Ok(_)) => true,
            (Expect::Failure(None), Err(_)) => true,
            (Expect::Failure(Some(expected)), Err(e)) => expected.to_string() == e.to_string(),
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct Fixture<R: Debug> {
    pub chain: MockChain,
    pub request: R,
}

impl<R: Debug> Fixture<R> {
    pub fn generate_error_msg<T: Debug>(
        &self,
        expect: &Expect,
        process: &str,
        res: &Result<T, QueryError>,
    ) -> String {
        let base_error = match expect {
            Expect::Success => "query failed!",
            Expect::Failure(_) => "query passed but was supposed to fail!",
        };
        format!(
            "{process} {base_error} /n {res:?} /n {:?} /n {:?}",
            &self.request, &self.chain
        )
    }
}
