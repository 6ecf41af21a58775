use std::collections::BTreeMap;

use bytes::Bytes;

use super::error::BencodeError;
use super::value::Value;

const MAX_DEPTH: usize = 64;

/// Decodes a bencode value from a byte slice.
///
/// The input must contain exactly one complete bencode value with no
/// trailing data.
///
/// # Errors
///
/// Returns an error on truncated input, malformed integers, duplicate
/// dictionary keys, nesting deeper than 64 levels, or data left over after
/// the top-level value.
///
/// # Examples
///
/// ```
/// use grabit::bencode::decode;
///
/// let value = decode(b"l4:spam4:eggse").unwrap();
/// assert_eq!(value.as_list().unwrap().len(), 2);
/// ```
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    let mut decoder = Decoder { data, pos: 0 };
    let value = decoder.value(0)?;

    if decoder.pos != data.len() {
        return Err(BencodeError::TrailingData);
    }

    Ok(value)
}

struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Decoder<'_> {
    fn peek(&self) -> Result<u8, BencodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(BencodeError::UnexpectedEof)
    }

    fn value(&mut self, depth: usize) -> Result<Value, BencodeError> {
        if depth > MAX_DEPTH {
            return Err(BencodeError::NestingTooDeep);
        }

        match self.peek()? {
            b'i' => self.integer(),
            b'l' => self.list(depth),
            b'd' => self.dict(depth),
            b'0'..=b'9' => self.byte_string().map(Value::Bytes),
            c => Err(BencodeError::UnexpectedChar(c as char)),
        }
    }

    fn integer(&mut self) -> Result<Value, BencodeError> {
        self.pos += 1;

        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos] != b'e' {
            self.pos += 1;
        }

        if self.pos >= self.data.len() {
            return Err(BencodeError::UnexpectedEof);
        }

        let digits = std::str::from_utf8(&self.data[start..self.pos])
            .map_err(|_| BencodeError::InvalidInteger("invalid utf8".into()))?;

        if digits.is_empty() {
            return Err(BencodeError::InvalidInteger("empty".into()));
        }

        // Canonical encodings never carry -0 or a padded magnitude.
        if digits.starts_with("-0") || (digits.starts_with('0') && digits.len() > 1) {
            return Err(BencodeError::InvalidInteger("leading zeros".into()));
        }

        let value: i64 = digits
            .parse()
            .map_err(|_| BencodeError::InvalidInteger(digits.into()))?;

        self.pos += 1;
        Ok(Value::Integer(value))
    }

    fn byte_string(&mut self) -> Result<Bytes, BencodeError> {
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos] != b':' {
            self.pos += 1;
        }

        if self.pos >= self.data.len() {
            return Err(BencodeError::UnexpectedEof);
        }

        let len_digits = std::str::from_utf8(&self.data[start..self.pos])
            .map_err(|_| BencodeError::InvalidStringLength)?;

        let len: usize = len_digits
            .parse()
            .map_err(|_| BencodeError::InvalidStringLength)?;

        self.pos += 1;

        if self.data.len() - self.pos < len {
            return Err(BencodeError::LengthExceedsInput);
        }

        let bytes = Bytes::copy_from_slice(&self.data[self.pos..self.pos + len]);
        self.pos += len;

        Ok(bytes)
    }

    fn list(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.pos += 1;
        let mut list = Vec::new();

        while self.peek()? != b'e' {
            list.push(self.value(depth + 1)?);
        }

        self.pos += 1;
        Ok(Value::List(list))
    }

    fn dict(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.pos += 1;
        let mut dict = BTreeMap::new();

        while self.peek()? != b'e' {
            if !self.peek()?.is_ascii_digit() {
                return Err(BencodeError::InvalidDictKey);
            }
            let key = self.byte_string()?;
            let value = self.value(depth + 1)?;
            if dict.insert(key, value).is_some() {
                return Err(BencodeError::DuplicateKey);
            }
        }

        self.pos += 1;
        Ok(Value::Dict(dict))
    }
}
