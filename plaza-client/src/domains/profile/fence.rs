//! Monotonic request tickets.
//!
//! Every outbound availability request carries a ticket. A response is only
//! allowed to touch state while its ticket is still the current one; issuing
//! a newer ticket or superseding the fence silently retires older ones.

/// Identifier of one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Placeholder that no issued ticket ever equals.
    pub const NONE: Self = Self(0);

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct RequestFence {
    last_issued: u64,
    current: Option<u64>,
}

impl RequestFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket greater than every ticket issued before and make it the
    /// only current one.
    pub fn issue(&mut self) -> RequestTicket {
        self.last_issued += 1;
        self.current = Some(self.last_issued);
        RequestTicket(self.last_issued)
    }

    /// Retire the current ticket without issuing a replacement.
    pub fn supersede(&mut self) {
        self.current = None;
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.current == Some(ticket.0)
    }

    /// True while a ticket is outstanding.
    pub fn in_flight(&self) -> bool {
        self.current.is_some()
    }

    /// Drop the current ticket only if it is `ticket`. Used once a response
    /// has been applied.
    pub fn complete(&mut self, ticket: RequestTicket) -> bool {
        if self.is_current(ticket) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
