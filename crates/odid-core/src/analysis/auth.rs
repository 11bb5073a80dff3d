use crate::AuthSummary;
use crate::protocols::odid::layout::{MAX_AUTH_DATA, MAX_AUTH_DATA_PAGES};
use crate::protocols::odid::{AuthMetadata, Authentication};

/// Merges authentication pages received across separate messages.
///
/// Decoding is stateless, so every `Authentication` holds a single page. The
/// assembler copies each page into one 362-byte buffer. A page 0 with a new
/// timestamp starts a fresh sequence and drops pages merged so far.
#[derive(Debug, Clone)]
pub struct AuthAssembler {
    auth_type: u8,
    metadata: Option<AuthMetadata>,
    pages_seen: u16,
    data: [u8; MAX_AUTH_DATA],
}

impl Default for AuthAssembler {
    fn default() -> Self {
        Self {
            auth_type: 0,
            metadata: None,
            pages_seen: 0,
            data: [0u8; MAX_AUTH_DATA],
        }
    }
}

impl AuthAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, page: &Authentication) {
        if let Some(meta) = page.metadata {
            let restarted = self
                .metadata
                .is_some_and(|current| current.timestamp != meta.timestamp);
            if restarted {
                tracing::debug!(timestamp = meta.timestamp, "authentication sequence restarted");
                *self = Self::default();
            }
            self.metadata = Some(meta);
        }
        self.auth_type = page.auth_type;
        let range = Authentication::page_range(page.page_index);
        self.data[range.clone()].copy_from_slice(&page.data[range]);
        self.pages_seen |= 1 << page.page_index;
    }

    pub fn pages_seen(&self) -> Vec<u8> {
        (0..MAX_AUTH_DATA_PAGES as u8)
            .filter(|page| self.pages_seen & (1 << page) != 0)
            .collect()
    }

    /// All pages 0..=last_page_index have arrived.
    pub fn is_complete(&self) -> bool {
        match self.metadata {
            Some(meta) => {
                let last = meta.last_page_index.min(MAX_AUTH_DATA_PAGES as u8 - 1);
                (0..=last).all(|page| self.pages_seen & (1 << page) != 0)
            }
            None => false,
        }
    }

    /// Merged bytes up to the end of the last page announced by page 0, or
    /// the whole buffer while page 0 is still missing.
    pub fn data(&self) -> &[u8] {
        match self.metadata {
            Some(meta) => {
                let last = meta.last_page_index.min(MAX_AUTH_DATA_PAGES as u8 - 1);
                &self.data[..Authentication::page_range(last).end]
            }
            None => &self.data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pages_seen == 0
    }

    pub(crate) fn summary(&self) -> AuthSummary {
        AuthSummary {
            auth_type: self.auth_type,
            last_page_index: self.metadata.map(|m| m.last_page_index),
            length: self.metadata.map(|m| m.length),
            timestamp: self.metadata.map(|m| m.timestamp),
            pages_seen: self.pages_seen(),
            complete: self.is_complete(),
            data_hex: hex::encode(self.data()),
        }
    }
}
