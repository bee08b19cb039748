//! This module provides an implementation of sources as receivers of messages.
//! Pulling blocks until a message arrives; the source ends once every sender is gone.

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};

/// [`Receiving<X>`] abstracts receivers of messages of type `X` as a source.
///
/// There is exactly one [`Receiving`] per channel, so a channel is never drained by two traversals at once:
///
/// ```compile_fail
/// use stepseq::sources::Receiving;
///
/// let (_tx, rx) = Receiving::<u8>::channel();
/// let other = rx.clone();
/// ```
#[derive(Debug)]
pub struct Receiving<X> {
    /// receiver of messages
    receiver: Receiver<X>,
}

impl<X> Receiving<X> {
    /// Create an unbounded channel whose receiving end is a source.
    ///
    /// # Examples
    ///
    /// Sending values from another thread:
    ///
    /// ```
    /// use stepseq::sources::Receiving;
    /// use stepseq::IntoSeq;
    ///
    /// let (tx, rx) = Receiving::channel();
    ///
    /// let producer = std::thread::spawn(move || {
    ///     for n in 0..3 {
    ///         tx.send(n).unwrap();
    ///     }
    /// });
    ///
    /// assert_eq!(rx.seq().to_list(), vec![0, 1, 2]);
    /// producer.join().unwrap();
    /// ```
    pub fn channel() -> (Sender<X>, Self) {
        let (tx, rx) = unbounded();
        (tx, Receiving { receiver: rx })
    }

    /// Create a channel of capacity `cap` whose receiving end is a source.
    pub fn bounded(cap: usize) -> (Sender<X>, Self) {
        let (tx, rx) = bounded(cap);
        (tx, Receiving { receiver: rx })
    }
}

impl<X> From<Receiver<X>> for Receiving<X> {
    fn from(receiver: Receiver<X>) -> Self {
        Receiving { receiver }
    }
}

impl<X> Iterator for Receiving<X> {
    type Item = X;

    /// Block until the next message, or end the source if the channel is disconnected.
    fn next(&mut self) -> Option<X> {
        self.receiver.recv().ok()
    }
}
