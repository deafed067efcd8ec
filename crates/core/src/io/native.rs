//! GeoTIFF reading and writing on top of the `tiff` crate

use crate::error::{Error, Result};
use crate::io::geokeys::{geokeys_for, Georeference};
use crate::raster::{Raster, RasterElement};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{ColorType, Gray16, Gray32Float, Gray64Float, Gray8, GrayI16};
use tiff::encoder::{TiffEncoder, TiffValue};
use tiff::tags::Tag;

/// Sample type of a written GeoTIFF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleType {
    U8,
    U16,
    I16,
    #[default]
    F32,
    F64,
}

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    pub sample_type: SampleType,
}

impl GeoTiffOptions {
    pub fn with_sample_type(sample_type: SampleType) -> Self {
        Self { sample_type }
    }
}

/// Read the first band of a GeoTIFF file into a Raster
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(BufReader::new(file))
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8]) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data))
}

/// Cast a decoded buffer into `T`, keeping only the first of `samples`
/// interleaved samples per pixel.
pub fn cast_samples<T: RasterElement>(result: DecodingResult, samples: usize) -> Result<Vec<T>> {
    macro_rules! first_band {
        ($buf:expr) => {
            $buf.iter()
                .step_by(samples.max(1))
                .map(|&v| num_traits::cast(v).unwrap_or_else(T::default_nodata))
                .collect()
        };
    }

    let data = match result {
        DecodingResult::U8(buf) => first_band!(buf),
        DecodingResult::U16(buf) => first_band!(buf),
        DecodingResult::U32(buf) => first_band!(buf),
        DecodingResult::U64(buf) => first_band!(buf),
        DecodingResult::I8(buf) => first_band!(buf),
        DecodingResult::I16(buf) => first_band!(buf),
        DecodingResult::I32(buf) => first_band!(buf),
        DecodingResult::I64(buf) => first_band!(buf),
        DecodingResult::F32(buf) => first_band!(buf),
        DecodingResult::F64(buf) => first_band!(buf),
    };
    Ok(data)
}

fn decode_geotiff<T, R>(reader: R) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    let (rows, cols) = (height as usize, width as usize);

    let samples = decoder
        .get_tag_u32(Tag::SamplesPerPixel)
        .map(|s| s as usize)
        .unwrap_or(1);

    let data: Vec<T> = cast_samples(decoder.read_image()?, samples)?;
    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;

    let geo = Georeference::read(&mut decoder);
    if let Some(transform) = geo.transform {
        raster.set_transform(transform);
    }
    raster.set_crs(geo.crs);
    raster.set_nodata(geo.nodata.and_then(|v| num_traits::cast(v)));

    Ok(raster)
}

/// Write a Raster to a GeoTIFF file
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path.as_ref())?;
    encode_geotiff(raster, BufWriter::new(file), options.unwrap_or_default())
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(raster: &Raster<T>, options: Option<GeoTiffOptions>) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), options.unwrap_or_default())?;
    Ok(buf)
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    match options.sample_type {
        SampleType::U8 => encode_as::<Gray8, T, W>(raster, writer),
        SampleType::U16 => encode_as::<Gray16, T, W>(raster, writer),
        SampleType::I16 => encode_as::<GrayI16, T, W>(raster, writer),
        SampleType::F32 => encode_as::<Gray32Float, T, W>(raster, writer),
        SampleType::F64 => encode_as::<Gray64Float, T, W>(raster, writer),
    }
}

fn encode_as<C, T, W>(raster: &Raster<T>, writer: W) -> Result<()>
where
    C: ColorType,
    C::Inner: RasterElement,
    [C::Inner]: TiffValue,
    T: RasterElement,
    W: Write + Seek,
{
    let (rows, cols) = raster.shape();
    let nodata_out: Option<C::Inner> = raster.nodata().and_then(|v| num_traits::cast(v));

    let data: Vec<C::Inner> = raster
        .data()
        .iter()
        .map(|&v| {
            if raster.is_nodata(v) {
                nodata_out.unwrap_or_else(C::Inner::default_nodata)
            } else {
                num_traits::cast(v).unwrap_or_else(C::Inner::default_nodata)
            }
        })
        .collect();

    let mut encoder = TiffEncoder::new(writer)?;
    let mut image = encoder.new_image::<C>(cols as u32, rows as u32)?;

    let gt = raster.transform();
    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image.encoder().write_tag(Tag::ModelPixelScaleTag, &scale[..])?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image.encoder().write_tag(Tag::ModelTiepointTag, &tiepoint[..])?;

    let keys = geokeys_for(raster.crs());
    image.encoder().write_tag(Tag::GeoKeyDirectoryTag, &keys[..])?;

    if let Some(nodata) = nodata_out.and_then(|v| v.to_f64()) {
        image
            .encoder()
            .write_tag(Tag::GdalNodata, nodata.to_string().as_str())?;
    }

    image.write_data(&data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::CRS;
    use crate::raster::GeoTransform;

    fn land_cover() -> Raster<u8> {
        let data = vec![0u8, 3, 3, 11, 21, 21, 0, 3, 66];
        let mut r = Raster::from_vec(data, 3, 3).unwrap();
        r.set_transform(GeoTransform::new(-71.4, -34.0, 0.00025, -0.00025));
        r.set_crs(Some(CRS::wgs84()));
        r.set_nodata(Some(0));
        r
    }

    #[test]
    fn buffer_round_trip_keeps_georeference() {
        let src = land_cover();
        let opts = GeoTiffOptions::with_sample_type(SampleType::U8);
        let buf = write_geotiff_to_buffer(&src, Some(opts)).unwrap();
        let back: Raster<u8> = read_geotiff_from_buffer(&buf).unwrap();

        assert_eq!(back.shape(), (3, 3));
        assert_eq!(back.data(), src.data());
        assert_eq!(back.crs().and_then(|c| c.epsg()), Some(4326));
        assert_eq!(back.nodata(), Some(0));
        assert_eq!(back.transform(), src.transform());
    }

    #[test]
    fn float_output_by_default() {
        let src = land_cover();
        let buf = write_geotiff_to_buffer(&src, None).unwrap();
        let back: Raster<f32> = read_geotiff_from_buffer(&buf).unwrap();
        assert_eq!(back.get(2, 2).unwrap(), 66.0);
        assert_eq!(back.nodata(), Some(0.0));
    }
}
