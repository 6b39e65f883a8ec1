// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfirmTicket(u64);

impl ConfirmTicket {
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Hands out tickets for a transient confirmation dialog. At most one ticket
/// is live at a time and releasing is idempotent, so rapid repeat requests or
/// a double resolution never leave a stale dialog behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfirmGate {
    next: u64,
    live: Option<ConfirmTicket>,
}

impl ConfirmGate {
    pub const fn live(&self) -> Option<ConfirmTicket> {
        self.live
    }

    pub fn open(&mut self) -> ConfirmTicket {
        if let Some(stale) = self.live {
            debug!("confirm ticket {} replaced before resolution", stale.get());
        }
        self.next += 1;
        let ticket = ConfirmTicket(self.next);
        self.live = Some(ticket);
        ticket
    }

    /// Returns whether the ticket was still live. Releasing a ticket twice,
    /// or one that was replaced, is a no-op.
    pub fn release(&mut self, ticket: ConfirmTicket) -> bool {
        if self.live == Some(ticket) {
            self.live = None;
            return true;
        }
        debug!("redundant release of confirm ticket {}", ticket.get());
        false
    }
}
