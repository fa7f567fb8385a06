use crate::Vec;
use crate::vm::{ResourceExceededError, RuntimeError};
use alloc::fmt;

/// Fixed-capacity operand stack addressed by a stack pointer.
///
/// `sp` always names the next free slot, so the top element lives at
/// `sp - 1`. Storage grows on demand and never past the capacity: a push at
/// capacity is reported as a stack overflow.
///
/// Popping only moves `sp` down. The popped value stays in its slot until a
/// later push overwrites it, which is what [`Stack::last_popped`] reads.
///
/// # Examples
///
/// ```
/// use quill_core::vm::Stack;
///
/// let mut stack = Stack::new(100);
/// stack.push(42).unwrap();
/// stack.push(17).unwrap();
/// assert_eq!(stack.pop(), Ok(17));
/// assert_eq!(stack.peek(), Some(&42));
/// assert_eq!(stack.last_popped(), Some(&17));
/// ```
pub struct Stack<T> {
    /// Every slot written so far. Slots at `sp..` hold popped values.
    slots: Vec<T>,
    /// Next free slot.
    sp: usize,
    capacity: usize,
}

impl<T: Clone> Stack<T> {
    /// Creates an empty stack that holds at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        // Reserve a small prefix only; `capacity` may be far larger than memory.
        let initial_capacity = capacity.min(256);

        Self {
            slots: Vec::with_capacity(initial_capacity),
            sp: 0,
            capacity,
        }
    }

    /// Pushes a value onto the stack.
    ///
    /// Fails with [`ResourceExceededError::StackOverflow`] when the stack is
    /// already at capacity; the stack is left unchanged in that case.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), ResourceExceededError> {
        if self.sp >= self.capacity {
            return Err(ResourceExceededError::StackOverflow {
                capacity: self.capacity,
            });
        }

        if self.sp < self.slots.len() {
            self.slots[self.sp] = value;
        } else {
            self.slots.push(value);
        }
        self.sp += 1;
        Ok(())
    }

    /// Removes and returns the top value.
    ///
    /// The slot is not cleared; see [`Stack::last_popped`].
    #[inline]
    pub fn pop(&mut self) -> Result<T, RuntimeError> {
        if self.sp == 0 {
            return Err(RuntimeError::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.slots[self.sp].clone())
    }

    /// Returns a reference to the top value without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.sp.checked_sub(1).map(|top| &self.slots[top])
    }

    /// Returns the value in the slot just above the top.
    ///
    /// Right after a pop this is the value that was popped. Before any pop,
    /// or once a later push has reused the slot, it is whatever was last
    /// written there, if anything.
    #[inline]
    pub fn last_popped(&self) -> Option<&T> {
        self.slots.get(self.sp)
    }

    /// Number of live values (equal to `sp`).
    #[inline]
    pub fn len(&self) -> usize {
        self.sp
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    /// Maximum number of values the stack can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns an iterator over live values, bottom to top.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots[..self.sp].iter()
    }
}

impl<T: fmt::Debug + Clone> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("sp", &self.sp)
            .field("capacity", &self.capacity)
            .field("items", &&self.slots[..self.sp])
            .finish()
    }
}
