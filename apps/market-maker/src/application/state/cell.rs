//! Facet cells: single-writer, many-reader latest-value holders.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::watch;

/// Create a facet cell holding `initial`.
#[must_use]
pub fn facet<T: Send + Sync + 'static>(
    name: impl Into<String>,
    initial: T,
) -> (FacetPublisher<T>, FacetReader<T>) {
    let name = name.into();
    let (tx, rx) = watch::channel(Arc::new(initial));
    (
        FacetPublisher {
            name: name.clone(),
            tx,
        },
        FacetReader { name, rx },
    )
}

/// The single writer of a facet cell.
///
/// Not `Clone`: exactly one task owns the right to replace the value.
#[derive(Debug)]
pub struct FacetPublisher<T> {
    name: String,
    tx: watch::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> FacetPublisher<T> {
    /// Facet name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the facet's value. Readers see the new value on their next
    /// read; no history is kept.
    pub fn publish(&self, value: T) {
        self.tx.send_replace(Arc::new(value));
    }

    /// A new reader of this facet.
    #[must_use]
    pub fn reader(&self) -> FacetReader<T> {
        FacetReader {
            name: self.name.clone(),
            rx: self.tx.subscribe(),
        }
    }
}

/// A reader of a facet cell.
#[derive(Debug)]
pub struct FacetReader<T> {
    name: String,
    rx: watch::Receiver<Arc<T>>,
}

impl<T> Clone for FacetReader<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> FacetReader<T> {
    /// A reader over a value that never changes.
    #[must_use]
    pub fn fixed(name: impl Into<String>, value: Arc<T>) -> Self {
        let (_tx, rx) = watch::channel(value);
        Self {
            name: name.into(),
            rx,
        }
    }

    /// Facet name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Most recently published value.
    #[must_use]
    pub fn latest(&self) -> Arc<T> {
        Arc::clone(&self.rx.borrow())
    }
}

/// Something a derived facet can wait on.
pub trait ChangeSignal: Send {
    /// Resolves when the upstream value changes. Resolves to `false` once
    /// the upstream writer is gone and no further change can arrive.
    fn changed(&mut self) -> BoxFuture<'_, bool>;
}

impl<T: Send + Sync + 'static> ChangeSignal for FacetReader<T> {
    fn changed(&mut self) -> BoxFuture<'_, bool> {
        Box::pin(async move { self.rx.changed().await.is_ok() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_see_latest_value() {
        let (publisher, reader) = facet("price", 1_u32);
        let second = publisher.reader();
        assert_eq!(*reader.latest(), 1);

        publisher.publish(2);
        publisher.publish(3);

        assert_eq!(*reader.latest(), 3);
        assert_eq!(*second.latest(), 3);
        assert_eq!(reader.name(), "price");
    }

    #[test]
    fn fixed_reader_keeps_value() {
        let reader = FacetReader::fixed("group", Arc::new("g".to_string()));
        assert_eq!(reader.latest().as_str(), "g");
    }

    #[tokio::test]
    async fn change_signal_fires_on_publish() {
        let (publisher, reader) = facet("book", 0_u8);
        let mut signal = reader.clone();

        publisher.publish(1);
        assert!(signal.changed().await);

        drop(publisher);
        assert!(!signal.changed().await);
        assert_eq!(*reader.latest(), 1);
    }

    #[test]
    fn change_signal_waits_for_publish() {
        let (publisher, mut reader) = facet("inventory", 0_u8);
        let mut changed = tokio_test::task::spawn(reader.changed());
        tokio_test::assert_pending!(changed.poll());

        publisher.publish(1);
        assert!(changed.is_woken());
        tokio_test::assert_ready_eq!(changed.poll(), true);
    }
}
