//! Request tickets — keeps late responses from overwriting newer ones.
//!
//! Every API call the App issues is tagged with a [`Ticket`]: the slot it
//! belongs to plus a sequence number. Only the most recently issued ticket of
//! a slot is "current"; a response carrying any other ticket is stale and is
//! dropped instead of painted.
//!
//! ```text
//!  GoToPage(2)  → Listing#4 ──────────────┐
//!  GoToPage(3)  → Listing#5 ──┐           │
//!                             ▼           ▼
//!                      applied (current)  dropped (stale)
//! ```

use std::collections::HashMap;

use blog_proto::{ApiError, BlogClient, ListQuery, NewPost, Post, PostId, PostPage};

/// Independent request streams. A new request only supersedes older ones in
/// the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// List/search/pagination fetches.
    Listing,
    /// Single-post fetches for the detail and edit screens.
    Post,
    /// Create, update, delete.
    Mutation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: Slot,
    pub seq: u64,
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    next_seq: u64,
    latest: HashMap<Slot, u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket; it supersedes every earlier ticket of the same slot.
    pub fn issue(&mut self, slot: Slot) -> Ticket {
        self.next_seq += 1;
        self.latest.insert(slot, self.next_seq);
        Ticket {
            slot,
            seq: self.next_seq,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.get(&ticket.slot) == Some(&ticket.seq)
    }

    /// Mark the ticket answered. Returns false for stale tickets.
    pub fn settle(&mut self, ticket: &Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.latest.remove(&ticket.slot);
        true
    }

    /// True while some current ticket has no answer yet.
    pub fn any_pending(&self) -> bool {
        !self.latest.is_empty()
    }

    /// Orphan every outstanding ticket (e.g. when leaving a screen).
    pub fn invalidate_all(&mut self) {
        self.latest.clear();
    }
}

/// A command for the request worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    List(ListQuery),
    Get(PostId),
    Create(NewPost),
    Update(PostId, NewPost),
    Delete(PostId),
}

impl ApiRequest {
    pub fn slot(&self) -> Slot {
        match self {
            Self::List(_) => Slot::Listing,
            Self::Get(_) => Slot::Post,
            Self::Create(_) | Self::Update(..) | Self::Delete(_) => Slot::Mutation,
        }
    }
}

/// The outcome of an [`ApiRequest`], echoing what the App needs to apply it.
#[derive(Debug, Clone)]
pub enum ApiResponse {
    Listed(ListQuery, Result<PostPage, ApiError>),
    Fetched(PostId, Result<Post, ApiError>),
    Created(Result<Post, ApiError>),
    Updated(PostId, Result<Post, ApiError>),
    Deleted(PostId, Result<(), ApiError>),
}

pub async fn execute(client: &BlogClient, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::List(query) => {
            let result = client.list(&query).await;
            ApiResponse::Listed(query, result)
        }
        ApiRequest::Get(id) => {
            let result = client.get(&id).await;
            ApiResponse::Fetched(id, result)
        }
        ApiRequest::Create(post) => ApiResponse::Created(client.create(&post).await),
        ApiRequest::Update(id, post) => {
            let result = client.update(&id, &post).await;
            ApiResponse::Updated(id, result)
        }
        ApiRequest::Delete(id) => {
            let result = client.delete(&id).await;
            ApiResponse::Deleted(id, result)
        }
    }
}
