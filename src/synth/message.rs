use rtrb::{Consumer, Producer, RingBuffer};

/// Note events sent from the control surface straight to the render thread.
///
/// The pitch travels through the parameter store; the key is carried only so
/// the render side can report which key is sounding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoteMessage {
    NoteOn { key: u8 },
    NoteOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<NoteMessage>;
}

impl MessageReceiver for Consumer<NoteMessage> {
    fn pop(&mut self) -> Option<NoteMessage> {
        Consumer::pop(self).ok()
    }
}

pub const NOTE_QUEUE_SIZE: usize = 64;

/// Lock-free single-producer/single-consumer note queue.
pub fn note_queue() -> (Producer<NoteMessage>, Consumer<NoteMessage>) {
    RingBuffer::<NoteMessage>::new(NOTE_QUEUE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_arrive_in_order() {
        let (mut tx, mut rx) = note_queue();
        tx.push(NoteMessage::NoteOn { key: 3 }).unwrap();
        tx.push(NoteMessage::NoteOff).unwrap();

        assert_eq!(MessageReceiver::pop(&mut rx), Some(NoteMessage::NoteOn { key: 3 }));
        assert_eq!(MessageReceiver::pop(&mut rx), Some(NoteMessage::NoteOff));
        assert_eq!(MessageReceiver::pop(&mut rx), None);
    }
}
