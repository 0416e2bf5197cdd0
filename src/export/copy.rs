use std::io::{self, Read, Write};

/// Size of the buffer used to stream a record into its export target.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Stream every byte from `reader` into `writer` in [`CHUNK_SIZE`] pieces.
///
/// Returns the number of bytes copied. The writer is flushed before success is
/// reported; on error nothing is rolled back.
pub fn copy_chunked<R, W>(reader: &mut R, writer: &mut W) -> io::Result<u64>
where
	R: Read + ?Sized,
	W: Write + ?Sized,
{
	let mut buffer = [0u8; CHUNK_SIZE];
	let mut total = 0u64;
	loop {
		let read = match reader.read(&mut buffer) {
			Ok(0) => break,
			Ok(read) => read,
			Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
			Err(err) => return Err(err),
		};
		writer.write_all(&buffer[..read])?;
		total += read as u64;
	}
	writer.flush()?;
	Ok(total)
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Reader that reports every requested buffer size and can be interrupted once.
	struct TracingReader {
		data: Vec<u8>,
		offset: usize,
		requests: Vec<usize>,
		interrupt_once: bool,
	}

	impl Read for TracingReader {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			if self.interrupt_once {
				self.interrupt_once = false;
				return Err(io::Error::from(io::ErrorKind::Interrupted));
			}
			self.requests.push(buf.len());
			let remaining = &self.data[self.offset..];
			let count = remaining.len().min(buf.len());
			buf[..count].copy_from_slice(&remaining[..count]);
			self.offset += count;
			Ok(count)
		}
	}

	struct FailingWriter {
		accepted: usize,
		limit: usize,
	}

	impl Write for FailingWriter {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			if self.accepted >= self.limit {
				return Err(io::Error::other("disk full"));
			}
			let count = buf.len().min(self.limit - self.accepted);
			self.accepted += count;
			Ok(count)
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn copies_in_fixed_chunks() {
		let data: Vec<u8> = (0..20_000u32).map(|value| (value % 251) as u8).collect();
		let mut reader = TracingReader {
			data: data.clone(),
			offset: 0,
			requests: Vec::new(),
			interrupt_once: true,
		};
		let mut out = Vec::new();

		let copied = copy_chunked(&mut reader, &mut out).expect("copy");

		assert_eq!(copied, data.len() as u64);
		assert_eq!(out, data);
		assert!(reader.requests.iter().all(|&size| size == CHUNK_SIZE));
	}

	#[test]
	fn write_failure_is_reported() {
		let mut reader = io::Cursor::new(vec![7u8; 3 * CHUNK_SIZE]);
		let mut writer = FailingWriter {
			accepted: 0,
			limit: CHUNK_SIZE + 10,
		};

		let err = copy_chunked(&mut reader, &mut writer).expect_err("copy must fail");

		assert_eq!(err.to_string(), "disk full");
		assert_eq!(writer.accepted, CHUNK_SIZE + 10);
	}
}
