//! Test doubles for the pipeline's collaborators: a scripted generator, a
//! recording credential pool and an in-memory document store.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::llm_client::{LlmError, TextGenerator};
use crate::store::{Credential, CredentialPool, DocumentStore};
use crate::translation::content::ContentNode;

type Script = Box<dyn Fn(usize, &str) -> Result<String, LlmError> + Send + Sync>;

pub fn overloaded() -> LlmError {
    LlmError::Api {
        status: 529,
        message: "Overloaded".to_string(),
    }
}

/// Answers each call from a script indexed by call number.
pub struct ScriptedGenerator {
    script: Script,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl ScriptedGenerator {
    /// The script sees the call index and the prompt.
    pub fn new(script: impl Fn(usize, &str) -> Result<String, LlmError> + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replays `responses` in order; calls past the end fail as overloaded.
    pub fn sequence(responses: Vec<Result<String, LlmError>>) -> Self {
        let responses = Mutex::new(responses.into_iter().map(Some).collect::<Vec<_>>());
        Self::new(move |index, _| {
            responses
                .lock()
                .unwrap()
                .get_mut(index)
                .and_then(Option::take)
                .unwrap_or_else(|| Err(overloaded()))
        })
    }

    pub fn always(response: impl Fn() -> Result<String, LlmError> + Send + Sync + 'static) -> Self {
        Self::new(move |_, _| response())
    }

    /// Echoes the résumé JSON embedded in the prompt with every scalar passed
    /// through `translate`.
    pub fn echo(translate: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self::new(move |_, prompt| Ok(echo_translation(prompt, &translate)))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn models_called(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, m, _)| m.clone()).collect()
    }

    pub fn keys_used(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(k, _, _)| k.clone()).collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, _, p)| p.clone()).collect()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, api_key: &str, model: &str, prompt: &str) -> Result<String, LlmError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((api_key.to_string(), model.to_string(), prompt.to_string()));
            calls.len() - 1
        };
        (self.script)(index, prompt)
    }
}

/// Pulls the content JSON out of a translation prompt and maps its scalars.
pub fn echo_translation(prompt: &str, translate: &dyn Fn(&str) -> String) -> String {
    let json = prompt
        .split("RÉSUMÉ JSON:\n")
        .nth(1)
        .expect("prompt carries résumé JSON");
    let content: ContentNode = serde_json::from_str(json).expect("prompt JSON parses");
    content.map_scalars(&mut |_, text| translate(text)).to_string()
}

/// Credential pool that remembers every report.
pub struct RecordingPool {
    credentials: Vec<Credential>,
    failed: Mutex<HashSet<Uuid>>,
    usage: Mutex<Vec<(Uuid, bool, String)>>,
    marked: Mutex<Vec<(Uuid, String)>>,
    fail_reports: bool,
}

impl RecordingPool {
    pub fn with_credentials(count: usize) -> Self {
        Self {
            credentials: (0..count)
                .map(|i| Credential {
                    id: Uuid::new_v4(),
                    secret: format!("sk-test-{i}"),
                })
                .collect(),
            failed: Mutex::new(HashSet::new()),
            usage: Mutex::new(Vec::new()),
            marked: Mutex::new(Vec::new()),
            fail_reports: false,
        }
    }

    /// `record_usage` and `mark_failed` return errors (after recording).
    pub fn failing_reports(mut self) -> Self {
        self.fail_reports = true;
        self
    }

    pub fn credential(&self, index: usize) -> Credential {
        self.credentials[index].clone()
    }

    pub fn usage(&self) -> Vec<(Uuid, bool, String)> {
        self.usage.lock().unwrap().clone()
    }

    pub fn marked_failed(&self) -> Vec<(Uuid, String)> {
        self.marked.lock().unwrap().clone()
    }

    fn report_result(&self) -> Result<()> {
        if self.fail_reports {
            Err(anyhow!("credential store offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CredentialPool for RecordingPool {
    async fn get_best_credential(&self, _service: &str) -> Result<Option<Credential>> {
        let failed = self.failed.lock().unwrap();
        Ok(self
            .credentials
            .iter()
            .find(|c| !failed.contains(&c.id))
            .cloned())
    }

    async fn record_usage(&self, credential_id: Uuid, success: bool, note: &str) -> Result<()> {
        self.usage
            .lock()
            .unwrap()
            .push((credential_id, success, note.to_string()));
        self.report_result()
    }

    async fn mark_failed(&self, credential_id: Uuid, reason: &str) -> Result<()> {
        self.failed.lock().unwrap().insert(credential_id);
        self.marked
            .lock()
            .unwrap()
            .push((credential_id, reason.to_string()));
        self.report_result()
    }
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<Uuid, ContentNode>>,
}

impl MemoryDocumentStore {
    pub fn with_document(id: Uuid, document: ContentNode) -> Self {
        let store = Self::default();
        store.documents.lock().unwrap().insert(id, document);
        store
    }

    pub fn get(&self, id: Uuid) -> Option<ContentNode> {
        self.documents.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn load(&self, id: Uuid) -> Result<Option<ContentNode>> {
        Ok(self.get(id))
    }

    async fn save(&self, id: Uuid, document: &ContentNode) -> Result<()> {
        self.documents.lock().unwrap().insert(id, document.clone());
        Ok(())
    }
}
