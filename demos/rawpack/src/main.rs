use anyhow::{bail, Context, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use voxbit_core::{StorageType, TypeCatalog, ValueRange};
use voxbit_render::{CodeBuffer, RangeQuantizer};

const MAGIC: &[u8; 4] = b"VXPK";
const VERSION: u8 = 1;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Raw little-endian f32 input (packed container when --restore is set).
    /// If omitted, synthetic data is generated.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file: packed container, or raw f32 when --restore is set
    #[arg(long, default_value = "packed.vxb")]
    output: PathBuf,

    /// Restore a packed container back to raw f32
    #[arg(long)]
    restore: bool,

    /// Effective bit depth of the stored codes
    #[arg(long, default_value_t = 16)]
    bits: u8,

    /// Value mapping to the minimum code (default: data minimum)
    #[arg(long)]
    low: Option<f32>,

    /// Value mapping to the maximum code (default: data maximum)
    #[arg(long)]
    high: Option<f32>,

    /// Storage target: flexible, u8, i8, u16, i16, u32, i32 or f32
    #[arg(long, default_value = "flexible")]
    storage: String,

    /// Number of synthetic samples when no input file is given
    #[arg(long, default_value_t = 65_536)]
    synthetic: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.restore {
        let input = args
            .input
            .as_deref()
            .context("--restore needs --input pointing at a packed container")?;
        let samples = restore_container(input)?;
        write_raw_f32(&args.output, &samples)?;
        println!("Restored {} samples to {}", samples.len(), args.output.display());
        return Ok(());
    }

    let samples = match args.input.as_deref() {
        Some(path) => {
            println!("Reading raw f32 stream: {}", path.display());
            read_raw_f32(path)?
        }
        None => {
            println!("No input given; generating {} synthetic samples", args.synthetic);
            generate_synthetic(args.synthetic)
        }
    };
    if samples.is_empty() {
        bail!("input stream holds no samples");
    }

    // Range defaults to the observed data extremes, like a writer that has
    // already scanned the frame.
    let (data_min, data_max) = extremes(&samples);
    let low = args.low.unwrap_or(data_min);
    let high = args.high.unwrap_or(data_max);
    let range = ValueRange::new(low, high)
        .with_context(|| format!("unusable sample range [{low}, {high}]"))?;

    let declared = parse_storage(&args.storage)?;
    let catalog = TypeCatalog::new(&[
        StorageType::Uint8,
        StorageType::Uint16,
        StorageType::Uint32,
        StorageType::Float,
    ])?;
    let target = catalog.resolve(declared, args.bits)?;

    let quantizer = RangeQuantizer::new(args.bits, range)?;
    let (codes, clipped) = quantizer.quantize_dynamic(&samples, target)?;

    println!(
        "Packing {} samples at {} bits into {:?} over [{}, {}]",
        samples.len(),
        args.bits,
        target,
        low,
        high
    );
    if clipped > 0 {
        println!(
            "warning: {} of {} samples exceeded the configured range and were clipped",
            clipped,
            samples.len()
        );
    }

    let raw_bytes = samples.len() * 4;
    let packed_bytes = write_container(&args.output, &quantizer, codes)?;
    println!(
        "✓ Wrote {} ({} -> {} bytes, {:.2}x)",
        args.output.display(),
        raw_bytes,
        packed_bytes,
        raw_bytes as f64 / packed_bytes as f64
    );

    Ok(())
}

fn parse_storage(name: &str) -> Result<StorageType> {
    Ok(match name {
        "flexible" => StorageType::Flexible,
        "u8" => StorageType::Uint8,
        "i8" => StorageType::Int8,
        "u16" => StorageType::Uint16,
        "i16" => StorageType::Int16,
        "u32" => StorageType::Uint32,
        "i32" => StorageType::Int32,
        "f32" => StorageType::Float,
        other => bail!("unknown storage target {other:?}"),
    })
}

fn storage_tag(ty: StorageType) -> u8 {
    match ty {
        StorageType::Uint8 => 0,
        StorageType::Int8 => 1,
        StorageType::Uint16 => 2,
        StorageType::Int16 => 3,
        StorageType::Uint32 => 4,
        StorageType::Int32 => 5,
        _ => 6,
    }
}

fn extremes(samples: &[f32]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in samples {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

/// Smooth decaying oscillation; enough dynamic range to make narrow bit
/// depths visibly clip when the range is overridden.
fn generate_synthetic(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 * 0.01;
            (t.sin() + 0.25 * (7.0 * t).sin()) * (-t * 0.001).exp() * 100.0
        })
        .collect()
}

fn read_raw_f32(path: &Path) -> Result<Vec<f32>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut samples = Vec::new();
    loop {
        match reader.read_f32::<LittleEndian>() {
            Ok(v) => samples.push(v),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e).context("read f32 stream"),
        }
    }
    Ok(samples)
}

fn write_raw_f32(path: &Path, samples: &[f32]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for &v in samples {
        writer.write_f32::<LittleEndian>(v).context("write f32")?;
    }
    Ok(())
}

// Container: [magic "VXPK"] [u8 version] [u8 storage tag] [u8 bits]
//            [f32 low] [f32 high] [u32 count] [codes, little endian]
fn write_container(path: &Path, quantizer: &RangeQuantizer, codes: CodeBuffer) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    w.write_all(MAGIC).context("write magic")?;
    w.write_u8(VERSION).context("write version")?;
    w.write_u8(storage_tag(codes.storage_type())).context("write storage tag")?;
    w.write_u8(quantizer.bit_depth()).context("write bit depth")?;
    w.write_f32::<LittleEndian>(quantizer.range().low()).context("write low")?;
    w.write_f32::<LittleEndian>(quantizer.range().high()).context("write high")?;
    w.write_u32::<LittleEndian>(codes.len() as u32).context("write count")?;

    let payload = codes.into_le_bytes();
    w.write_all(&payload).context("write codes")?;
    Ok(payload.len())
}

fn restore_container(path: &Path) -> Result<Vec<f32>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut r = BufReader::new(file);

    let mut magic = [0u8; 4];
    r.read_exact(&mut magic).context("read magic")?;
    if &magic != MAGIC {
        bail!("not a rawpack container");
    }
    let version = r.read_u8().context("read version")?;
    if version != VERSION {
        bail!("unsupported container version {version}");
    }

    let tag = r.read_u8().context("read storage tag")?;
    let bits = r.read_u8().context("read bit depth")?;
    let low = r.read_f32::<LittleEndian>().context("read low")?;
    let high = r.read_f32::<LittleEndian>().context("read high")?;
    let count = r.read_u32::<LittleEndian>().context("read count")? as usize;

    let codes = match tag {
        0 => {
            let mut v = vec![0u8; count];
            r.read_exact(&mut v).context("read codes")?;
            CodeBuffer::U8(v)
        }
        1 => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(r.read_i8().context("read codes")?);
            }
            CodeBuffer::I8(v)
        }
        2 => {
            let mut v = vec![0u16; count];
            r.read_u16_into::<LittleEndian>(&mut v).context("read codes")?;
            CodeBuffer::U16(v)
        }
        3 => {
            let mut v = vec![0i16; count];
            r.read_i16_into::<LittleEndian>(&mut v).context("read codes")?;
            CodeBuffer::I16(v)
        }
        4 => {
            let mut v = vec![0u32; count];
            r.read_u32_into::<LittleEndian>(&mut v).context("read codes")?;
            CodeBuffer::U32(v)
        }
        5 => {
            let mut v = vec![0i32; count];
            r.read_i32_into::<LittleEndian>(&mut v).context("read codes")?;
            CodeBuffer::I32(v)
        }
        6 => {
            let mut v = vec![0f32; count];
            r.read_f32_into::<LittleEndian>(&mut v).context("read codes")?;
            CodeBuffer::F32(v)
        }
        other => bail!("unknown storage tag {other}"),
    };

    let range = ValueRange::new(low, high).context("container range")?;
    let quantizer = RangeQuantizer::new(bits, range).context("container bit depth")?;
    Ok(quantizer.restore_dynamic(&codes)?)
}
