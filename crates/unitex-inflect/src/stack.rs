// Inflection buffer: the lemma being edited and a cursor.
//
// Op-codes of a transducer tag input, applied left to right:
//   L   cursor one step left (no effect at the start)
//   R   cursor one step right
//   C   duplicate the character before the cursor, then move right
//   D   delete the character before the cursor, then move left
//   any other character is written at the cursor, which moves right
// Characters after the cursor are kept until the form is finished, so `R`
// can restore what `L` skipped. The finished form ends at the cursor.

use crate::StackError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflectionStack {
    chars: Vec<char>,
    pos: usize,
    capacity: usize,
}

impl InflectionStack {
    /// A buffer holding `form`, cursor at its end.
    pub fn new(form: &str, capacity: usize) -> Result<Self, StackError> {
        let chars: Vec<char> = form.chars().collect();
        if chars.len() > capacity {
            return Err(StackError::BufferOverflow { capacity });
        }
        let pos = chars.len();
        Ok(Self {
            chars,
            pos,
            capacity,
        })
    }

    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// All buffered characters, including those after the cursor.
    pub fn content(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn apply(&mut self, ops: &str) -> Result<(), StackError> {
        ops.chars().try_for_each(|op| self.apply_op(op))
    }

    pub fn apply_op(&mut self, op: char) -> Result<(), StackError> {
        match op {
            'L' => {
                self.pos = self.pos.saturating_sub(1);
            }
            'R' => {
                if self.pos >= self.capacity {
                    return Err(self.overflow());
                }
                self.pos += 1;
            }
            'C' => {
                if self.pos > 0 {
                    self.check_cursor()?;
                    if self.chars.len() >= self.capacity {
                        return Err(self.overflow());
                    }
                    let c = self.chars[self.pos - 1];
                    self.chars.insert(self.pos, c);
                }
                self.pos += 1;
            }
            'D' => {
                if self.pos == 0 {
                    return Err(StackError::DeleteAtStart);
                }
                self.check_cursor()?;
                self.chars.remove(self.pos - 1);
                self.pos -= 1;
            }
            c => {
                self.check_cursor()?;
                if self.pos == self.chars.len() {
                    if self.chars.len() >= self.capacity {
                        return Err(self.overflow());
                    }
                    self.chars.push(c);
                } else {
                    self.chars[self.pos] = c;
                }
                self.pos += 1;
            }
        }
        Ok(())
    }

    /// The form up to the cursor.
    pub fn finish(mut self) -> Result<String, StackError> {
        self.check_cursor()?;
        self.chars.truncate(self.pos);
        Ok(self.chars.into_iter().collect())
    }

    fn check_cursor(&self) -> Result<(), StackError> {
        if self.pos > self.chars.len() {
            return Err(StackError::CursorOutOfRange {
                pos: self.pos,
                len: self.chars.len(),
            });
        }
        Ok(())
    }

    fn overflow(&self) -> StackError {
        StackError::BufferOverflow {
            capacity: self.capacity,
        }
    }
}
