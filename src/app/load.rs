use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::warn;

use crate::nuclide::{Catalog, DecayIndex, load_catalog, load_decay_index};

pub(in crate::app) type CatalogReceiver = Receiver<Result<Catalog, String>>;
pub(in crate::app) type IndexReceiver = Receiver<Result<Option<DecayIndex>, String>>;

#[derive(Clone, Debug)]
pub struct DataSources {
    pub table: PathBuf,
    pub decay_index: Option<PathBuf>,
}

impl DataSources {
    /// Starts both loads at once; each result arrives on its own channel.
    pub(in crate::app) fn spawn(&self) -> (CatalogReceiver, IndexReceiver) {
        let (catalog_tx, catalog_rx) = mpsc::channel();
        let table = self.table.clone();
        thread::spawn(move || {
            let result = load_catalog(&table).map_err(|error| format!("{error:#}"));
            let _ = catalog_tx.send(result);
        });

        let (index_tx, index_rx) = mpsc::channel();
        let decay_index = self.decay_index.clone();
        thread::spawn(move || {
            let result =
                load_decay_index(decay_index.as_deref()).map_err(|error| format!("{error:#}"));
            let _ = index_tx.send(result);
        });

        (catalog_rx, index_rx)
    }
}

/// The optional decay index as seen by the UI thread.
pub(in crate::app) enum IndexSlot {
    Pending(IndexReceiver),
    Loaded(DecayIndex),
    Unavailable,
}

impl IndexSlot {
    /// Polls a pending load; returns `true` when the slot just became terminal.
    pub(in crate::app) fn poll(&mut self) -> bool {
        let Self::Pending(rx) = self else {
            return false;
        };

        let next = match rx.try_recv() {
            Ok(Ok(Some(index))) => Self::Loaded(index),
            Ok(Ok(None)) => Self::Unavailable,
            Ok(Err(error)) => {
                warn!(%error, "decay index unavailable, falling back to derived branches");
                Self::Unavailable
            }
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                warn!("decay index loader exited without a result");
                Self::Unavailable
            }
        };

        *self = next;
        true
    }

    pub(in crate::app) fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    pub(in crate::app) fn index(&self) -> Option<&DecayIndex> {
        match self {
            Self::Loaded(index) => Some(index),
            Self::Pending(_) | Self::Unavailable => None,
        }
    }

    pub(in crate::app) fn status_text(&self) -> String {
        match self {
            Self::Pending(_) => "decay index: loading".to_owned(),
            Self::Loaded(index) => format!("decay index: {} parents", index.len()),
            Self::Unavailable => "decay index: derived branches only".to_owned(),
        }
    }
}
