/// Stack of previously active views. The top is the active one.
#[derive(Debug)]
pub struct History<T> {
    stack: Vec<T>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        History { stack: Vec::new() }
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `item` and return a handle to it as the new top
    pub fn push(&mut self, item: T) -> &mut T {
        self.stack.push(item);
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn pop(&mut self) -> Option<T> {
        self.stack.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.stack.last()
    }

    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.stack.last_mut()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
