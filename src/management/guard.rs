use std::collections::HashMap;

/// Kinds of catalog fetch. A new fetch of a kind supersedes every older one
/// of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Artists,
    View,
    Albums,
    Favorites,
    MyPlaylists,
    PublicPlaylists,
    PlaylistDetail,
}

/// Proof of which request a response belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    kind: FetchKind,
    generation: u64,
}

impl Ticket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }
}

/// Last-request-wins bookkeeping per [`FetchKind`].
#[derive(Debug, Default)]
pub struct RequestGuard {
    generations: HashMap<FetchKind, u64>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request of `kind`, invalidating any still in flight.
    pub fn begin(&mut self, kind: FetchKind) -> Ticket {
        let generation = self.bump(kind);
        Ticket { kind, generation }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generations.get(&ticket.kind) == Some(&ticket.generation)
    }

    /// Invalidates the in-flight request of `kind` without starting a new one.
    pub fn cancel(&mut self, kind: FetchKind) {
        self.bump(kind);
    }

    // Generations only ever grow: resetting them could revive an old ticket.
    pub fn cancel_all(&mut self) {
        for generation in self.generations.values_mut() {
            *generation += 1;
        }
    }

    fn bump(&mut self, kind: FetchKind) -> u64 {
        let generation = self.generations.entry(kind).or_insert(0);
        *generation += 1;
        *generation
    }
}
