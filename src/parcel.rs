//! 跨进程传输格式
//!
//! 所有数据按小端序写入并对齐到 4 字节；字符串以 UTF-16 存储，
//! 前置长度（null 为 -1），末尾带一个 NUL。

use anyhow::{bail, Context, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// 写入与读取使用各自的缓冲区
///
/// 写入的数据要先经过 [`Parcel::marshall`] 取出，再用 [`Parcel::from_bytes`]
/// 构造新的 `Parcel` 才能读取。
#[derive(Debug, Default)]
pub struct Parcel {
    write: BytesMut,
    read: Bytes,
}

/// 可以写入 [`Parcel`] 的对象
pub trait Parcelable: Sized {
    fn write_to_parcel(&self, dest: &mut Parcel);

    fn from_parcel(src: &mut Parcel) -> Result<Self>;
}

impl Parcel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有数据中读取
    pub fn from_bytes<B: Into<Bytes>>(bytes: B) -> Self {
        Self {
            write: BytesMut::new(),
            read: bytes.into(),
        }
    }

    /// 取出已写入的数据
    pub fn marshall(self) -> Bytes {
        self.write.freeze()
    }

    pub fn remaining(&self) -> usize {
        self.read.remaining()
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write.put_i32_le(v);
    }

    pub fn write_byte(&mut self, v: i8) {
        self.write_i32(i32::from(v));
    }

    pub fn write_string(&mut self, s: Option<&str>) {
        let s = match s {
            Some(s) => s,
            None => return self.write_i32(-1),
        };
        let units = s.encode_utf16().collect::<Vec<_>>();
        self.write_i32(units.len() as i32);
        for unit in &units {
            self.write.put_u16_le(*unit);
        }
        self.write.put_u16_le(0);
        let written = (units.len() + 1) * 2;
        self.write.put_bytes(0, padding(written));
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.read.get_i32_le())
    }

    pub fn read_byte(&mut self) -> Result<i8> {
        Ok(self.read_i32()? as i8)
    }

    pub fn read_string(&mut self) -> Result<Option<String>> {
        let len = self.read_i32()?;
        if len == -1 {
            return Ok(None);
        }
        if len < 0 {
            bail!("非法字符串长度: {}", len);
        }
        let len = len as usize;
        let size = (len + 1) * 2;
        self.ensure(size + padding(size))?;
        let units = (0..len).map(|_| self.read.get_u16_le()).collect::<Vec<_>>();
        if self.read.get_u16_le() != 0 {
            bail!("字符串缺少结尾");
        }
        self.read.advance(padding(size));
        let s = String::from_utf16(&units).context("字符串不是合法的 UTF-16")?;
        Ok(Some(s))
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.read.remaining() < n {
            bail!("数据不足: 需要 {} 字节, 剩余 {}", n, self.read.remaining());
        }
        Ok(())
    }
}

fn padding(size: usize) -> usize {
    (4 - size % 4) % 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives() {
        let mut parcel = Parcel::new();
        parcel.write_i32(-7);
        parcel.write_byte(3);
        parcel.write_string(Some("ab"));
        parcel.write_string(None);
        parcel.write_string(Some("中文"));
        parcel.write_i32(42);
        let bytes = parcel.marshall();
        assert_eq!(bytes.len() % 4, 0);

        let mut parcel = Parcel::from_bytes(bytes);
        assert_eq!(parcel.read_i32().unwrap(), -7);
        assert_eq!(parcel.read_byte().unwrap(), 3);
        assert_eq!(parcel.read_string().unwrap().as_deref(), Some("ab"));
        assert_eq!(parcel.read_string().unwrap(), None);
        assert_eq!(parcel.read_string().unwrap().as_deref(), Some("中文"));
        assert_eq!(parcel.read_i32().unwrap(), 42);
        assert_eq!(parcel.remaining(), 0);
    }

    #[test]
    fn string_layout() {
        let mut parcel = Parcel::new();
        parcel.write_string(Some("a"));
        // 长度 + 'a' + NUL，刚好 8 字节
        assert_eq!(&parcel.marshall()[..], &[1, 0, 0, 0, b'a', 0, 0, 0]);
    }

    #[test]
    fn written_data_needs_marshall() {
        let mut parcel = Parcel::new();
        parcel.write_i32(1);
        assert_eq!(parcel.remaining(), 0);
        assert!(parcel.read_i32().is_err());

        let mut parcel = Parcel::from_bytes(parcel.marshall());
        assert_eq!(parcel.remaining(), 4);
        assert_eq!(parcel.read_i32().unwrap(), 1);
    }

    #[test]
    fn underflow() {
        let mut parcel = Parcel::from_bytes(vec![1u8, 0]);
        assert!(parcel.read_i32().is_err());

        let mut parcel = Parcel::new();
        parcel.write_i32(10);
        let mut parcel = Parcel::from_bytes(parcel.marshall());
        assert!(parcel.read_string().is_err());
    }
}
