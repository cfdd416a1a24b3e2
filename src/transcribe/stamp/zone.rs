use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context};
use time::UtcOffset;

const LOCALTIME_PATH: &str = "/etc/localtime";
const ZONEINFO_DIR: &str = "/usr/share/zoneinfo";

const MAGIC: &[u8] = b"TZif";
const HEADER_LEN: usize = 44;
const TTINFO_LEN: usize = 6;

/// Timezone abbreviations keyed by UTC offset, as found in a TZif file.
#[derive(Debug)]
pub struct Zone {
    // most recently used type first
    types: Vec<(i32, String)>,
}

impl Zone {
    /// Loads the zone named by `TZ`, or the system default zone.
    pub fn load_local() -> anyhow::Result<Zone> {
        let path = match env::var("TZ") {
            Ok(tz) => tz_path(&tz).ok_or_else(|| anyhow!("TZ={} does not name a zone file", tz))?,
            Err(_) => PathBuf::from(LOCALTIME_PATH),
        };

        Zone::load(&path)
    }

    pub fn load(path: &Path) -> anyhow::Result<Zone> {
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Zone::parse(&data).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(data: &[u8]) -> anyhow::Result<Zone> {
        let first = Header::read(data)?;
        let (header, block, time_size) = if first.version >= b'2' {
            // the 64-bit block follows the 32-bit one under its own header
            let rest = data.get(HEADER_LEN + first.block_len(4)..)
                .ok_or_else(|| anyhow!("truncated version 1 data"))?;
            (Header::read(rest)?, &rest[HEADER_LEN..], 8)
        } else {
            (first, &data[HEADER_LEN..], 4)
        };

        if block.len() < header.block_len(time_size) {
            bail!("truncated data block");
        }

        let idx_start = header.timecnt * time_size;
        let types_start = idx_start + header.timecnt;
        let chars_start = types_start + header.typecnt * TTINFO_LEN;
        let chars = &block[chars_start..chars_start + header.charcnt];

        let mut infos: Vec<(i32, String)> = Vec::with_capacity(header.typecnt);
        for t in 0..header.typecnt {
            let raw = &block[types_start + t * TTINFO_LEN..types_start + (t + 1) * TTINFO_LEN];
            let utoff = i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
            let desig = raw[5] as usize;
            let abbrev = chars.get(desig..)
                .and_then(|c| c.split(|b| *b == 0).next())
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .ok_or_else(|| anyhow!("abbreviation index {} out of range", desig))?;
            infos.push((utoff, abbrev));
        }

        let mut order: Vec<usize> = Vec::with_capacity(header.typecnt);
        for &i in block[idx_start..types_start].iter().rev() {
            let i = i as usize;
            if i < header.typecnt && !order.contains(&i) {
                order.push(i);
            }
        }
        for i in 0..header.typecnt {
            if !order.contains(&i) {
                order.push(i);
            }
        }

        Ok(Zone { types: order.into_iter().map(|i| infos[i].clone()).collect() })
    }

    pub fn from_pairs(pairs: &[(i32, &str)]) -> Zone {
        Zone { types: pairs.iter().map(|(o, a)| (*o, String::from(*a))).collect() }
    }

    pub fn abbreviation(&self, offset: UtcOffset) -> Option<&str> {
        let secs = offset.whole_seconds();
        self.types.iter()
            .find(|(o, a)| *o == secs && !a.is_empty())
            .map(|(_, a)| a.as_str())
    }
}

struct Header {
    version: u8,
    isutcnt: usize,
    isstdcnt: usize,
    leapcnt: usize,
    timecnt: usize,
    typecnt: usize,
    charcnt: usize,
}

impl Header {
    fn read(data: &[u8]) -> anyhow::Result<Header> {
        if data.len() < HEADER_LEN {
            bail!("truncated header");
        }
        if &data[..4] != MAGIC {
            bail!("not a TZif file");
        }

        let count = |n: usize| {
            let at = 20 + n * 4;
            u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]) as usize
        };

        Ok(Header {
            version: data[4],
            isutcnt: count(0),
            isstdcnt: count(1),
            leapcnt: count(2),
            timecnt: count(3),
            typecnt: count(4),
            charcnt: count(5),
        })
    }

    fn block_len(&self, time_size: usize) -> usize {
        self.timecnt * time_size
            + self.timecnt
            + self.typecnt * TTINFO_LEN
            + self.charcnt
            + self.leapcnt * (time_size + 4)
            + self.isstdcnt
            + self.isutcnt
    }
}

fn tz_path(tz: &str) -> Option<PathBuf> {
    let name = tz.strip_prefix(':').unwrap_or(tz);
    if name.is_empty() {
        return None;
    }

    let path = Path::new(name);
    if path.is_absolute() {
        return Some(path.to_path_buf());
    }

    let path = Path::new(ZONEINFO_DIR).join(name);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}
