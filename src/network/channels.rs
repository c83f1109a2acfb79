use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use log::{trace, warn};

use super::credit::Credit;
use super::NetworkLayer;
use crate::types::Payload;

/// Engine side of the network layer.
#[derive(Debug)]
pub struct Channels {
    outgoing: Receiver<Payload>,
    delivered: Sender<Payload>,
    credit: Arc<Credit>,
}

impl Channels {
    pub(super) const fn new(
        outgoing: Receiver<Payload>,
        delivered: Sender<Payload>,
        credit: Arc<Credit>,
    ) -> Self {
        Self {
            outgoing,
            delivered,
            credit,
        }
    }
}

impl NetworkLayer for Channels {
    fn pull(&mut self) -> Option<Payload> {
        self.outgoing.try_recv().ok()
    }

    fn push(&mut self, payload: Payload) {
        if self.delivered.send(payload).is_err() {
            warn!("Host disconnected. Discarding payload.");
        }
    }

    fn grant_credit(&mut self, credit: usize) {
        trace!("Granting {credit} unit(s) of credit.");
        self.credit.grant(credit);
    }
}
