//! In-memory port implementations shared by the use-case tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use smsrelay_domain::error::SmsRelayError;
use smsrelay_domain::handle::MessageHandle;
use smsrelay_domain::message::{MessageContents, MessageRef};
use smsrelay_domain::rule::{Rule, RuleSet};

use crate::ports::{CommandRunner, MessageSource};

/// One observable side effect, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Dispatched(String),
    Deleted(MessageHandle),
}

pub type Journal = Arc<Mutex<Vec<Step>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn rules(pairs: &[(&str, &str)]) -> Arc<RuleSet> {
    let rules = pairs
        .iter()
        .map(|(pattern, command)| Rule::new(*pattern, *command))
        .collect();
    Arc::new(RuleSet::new(rules).unwrap())
}

pub fn sms(id: u32, modem: u32) -> MessageRef {
    MessageRef::new(
        format!("/org/freedesktop/ModemManager1/SMS/{id}"),
        format!("/org/freedesktop/ModemManager1/Modem/{modem}"),
    )
}

fn failure(what: &str) -> SmsRelayError {
    SmsRelayError::Source(Box::new(std::io::Error::other(what.to_string())))
}

// ── Spy command runner ─────────────────────────────────────────────

pub struct SpyRunner {
    journal: Journal,
}

impl SpyRunner {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl CommandRunner for SpyRunner {
    fn dispatch(&self, command: &str) {
        self.journal
            .lock()
            .unwrap()
            .push(Step::Dispatched(command.to_string()));
    }
}

// ── In-memory message source ───────────────────────────────────────

type Queued = (MessageRef, MessageContents);

#[derive(Default)]
struct State {
    queued: Vec<Queued>,
    /// Batches that show up on successive `list_messages` calls after the first.
    arrivals: VecDeque<Vec<Queued>>,
    list_calls: usize,
}

pub struct InMemorySource {
    state: Mutex<State>,
    journal: Journal,
    pub fail_list: bool,
    pub fail_read: bool,
    pub fail_delete: bool,
}

impl InMemorySource {
    pub fn with(queued: Vec<Queued>, journal: Journal) -> Self {
        Self {
            state: Mutex::new(State {
                queued,
                ..State::default()
            }),
            journal,
            fail_list: false,
            fail_read: false,
            fail_delete: false,
        }
    }

    /// Queue a batch that appears on the next rescan.
    pub fn then_arrive(self, batch: Vec<Queued>) -> Self {
        self.state.lock().unwrap().arrivals.push_back(batch);
        self
    }

    pub fn remaining(&self) -> Vec<MessageRef> {
        let state = self.state.lock().unwrap();
        state.queued.iter().map(|(r, _)| r.clone()).collect()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }
}

impl MessageSource for InMemorySource {
    fn list_messages(
        &self,
    ) -> impl Future<Output = Result<Vec<MessageRef>, SmsRelayError>> + Send {
        let result = if self.fail_list {
            Err(failure("enumeration failed"))
        } else {
            let mut state = self.state.lock().unwrap();
            let arrived = if state.list_calls > 0 {
                state.arrivals.pop_front()
            } else {
                None
            };
            if let Some(batch) = arrived {
                state.queued.extend(batch);
            }
            state.list_calls += 1;
            Ok(state.queued.iter().map(|(r, _)| r.clone()).collect())
        };
        async move { result }
    }

    fn read_contents(
        &self,
        message: &MessageRef,
    ) -> impl Future<Output = Result<MessageContents, SmsRelayError>> + Send {
        let result = if self.fail_read {
            Err(failure("property read failed"))
        } else {
            let state = self.state.lock().unwrap();
            state
                .queued
                .iter()
                .find(|(r, _)| r == message)
                .map(|(_, c)| c.clone())
                .ok_or_else(|| failure("no such message"))
        };
        async move { result }
    }

    fn delete_message(
        &self,
        message: &MessageRef,
    ) -> impl Future<Output = Result<(), SmsRelayError>> + Send {
        self.journal
            .lock()
            .unwrap()
            .push(Step::Deleted(message.message.clone()));
        let result = if self.fail_delete {
            Err(failure("delete failed"))
        } else {
            self.state
                .lock()
                .unwrap()
                .queued
                .retain(|(r, _)| r != message);
            Ok(())
        };
        async move { result }
    }
}
