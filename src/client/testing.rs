//! In-process `NomineeApi` doubles and fixtures for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

use crate::models::{Category, CategoryKey, CategoryNomineesResponse, Nominee};

use super::{FetchError, NomineeApi};

pub fn category(id: i64, name: &str, description: Option<&str>) -> Category {
    Category {
        id,
        name: name.to_string(),
        description: description.map(str::to_string),
        about: None,
        status: 1,
        order: 0,
        image: format!("https://tca.kaba.et/img/{}.png", id),
        has_voted: false,
        criteria: Vec::new(),
    }
}

pub fn nominee(id: &str, votes: u64) -> Nominee {
    Nominee {
        nominee_id: id.to_string(),
        name: format!("Nominee {}", id),
        username: id.to_string(),
        image: format!("https://tca.kaba.et/img/{}.png", id),
        number_of_followers: "1,200".to_string(),
        category_id: 1,
        total_vote_count: votes,
    }
}

pub fn detail(id: i64, name: &str, nominees: Vec<Nominee>) -> CategoryNomineesResponse {
    CategoryNomineesResponse {
        category: category(id, name, None),
        nominees,
    }
}

/// Canned upstream reply
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16),
    Timeout,
    Decode,
}

impl<T: Clone> Reply<T> {
    fn to_result(&self) -> Result<T, FetchError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(status) => Err(FetchError::Http { status: *status }),
            Reply::Timeout => Err(FetchError::Timeout(Duration::from_secs(10))),
            Reply::Decode => Err(FetchError::Decode("unexpected shape".to_string())),
        }
    }
}

/// Answers immediately from canned replies and counts calls
pub struct StubApi {
    list: Reply<Vec<Category>>,
    details: HashMap<String, Reply<CategoryNomineesResponse>>,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl StubApi {
    pub fn new(list: Reply<Vec<Category>>) -> Self {
        Self {
            list,
            details: HashMap::new(),
            list_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self::new(Reply::Ok(categories))
    }

    pub fn with_detail(mut self, id: &str, reply: Reply<CategoryNomineesResponse>) -> Self {
        self.details.insert(id.to_string(), reply);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NomineeApi for StubApi {
    async fn list_categories(&self) -> Result<Vec<Category>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list.to_result()
    }

    async fn category_nominees(
        &self,
        id: &CategoryKey,
    ) -> Result<CategoryNomineesResponse, FetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .get(id.as_str())
            .cloned()
            .unwrap_or(Reply::Status(404))
            .to_result()
    }
}

type Gate<T> = oneshot::Receiver<Result<T, FetchError>>;

/// Holds every request open until the test releases it
#[derive(Default)]
pub struct GatedApi {
    list: Mutex<Option<Gate<Vec<Category>>>>,
    details: Mutex<HashMap<String, Gate<CategoryNomineesResponse>>>,
}

impl GatedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate the next listing request; send on the returned handle to resolve it
    pub fn gate_list(&self) -> oneshot::Sender<Result<Vec<Category>, FetchError>> {
        let (tx, rx) = oneshot::channel();
        *self.list.lock().unwrap() = Some(rx);
        tx
    }

    /// Gate the next request for `id`
    pub fn gate_detail(
        &self,
        id: &str,
    ) -> oneshot::Sender<Result<CategoryNomineesResponse, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.details.lock().unwrap().insert(id.to_string(), rx);
        tx
    }
}

#[async_trait]
impl NomineeApi for GatedApi {
    async fn list_categories(&self) -> Result<Vec<Category>, FetchError> {
        let gate = self.list.lock().unwrap().take();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Network("gate dropped".to_string()))),
            None => Err(FetchError::Network("no gate".to_string())),
        }
    }

    async fn category_nominees(
        &self,
        id: &CategoryKey,
    ) -> Result<CategoryNomineesResponse, FetchError> {
        let gate = self.details.lock().unwrap().remove(id.as_str());
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Network("gate dropped".to_string()))),
            None => Err(FetchError::Network("no gate".to_string())),
        }
    }
}
