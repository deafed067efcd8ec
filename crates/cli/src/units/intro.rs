use anyhow::Result;

const OUTLINE: &[(&str, &str, &[&str])] = &[
    (
        "1. Vector data",
        "vector",
        &[
            "Basic geometries: point, line, polygon",
            "Geometric attributes: area, length, centroid, bounds",
            "Complex geometries and polygons with holes",
            "Topology: arcs, nodes, shortest paths and cycles",
        ],
    ),
    (
        "2. Raster data",
        "raster",
        &[
            "Grids, transforms and coordinate systems",
            "Land cover of Chile: classes and shares",
            "Clipping and summary statistics",
            "Terrain analysis: slope, aspect, hillshade",
            "Writing GeoTIFFs",
        ],
    ),
    (
        "3. Introduction to remote sensing",
        "remote-sensing",
        &[
            "Platforms and sensors",
            "Spatial, spectral, radiometric and temporal resolution",
            "Earth observation missions",
        ],
    ),
    (
        "4. Satellite image access",
        "imagery",
        &[
            "STAC catalogs: Planetary Computer and Earth Search",
            "Sentinel-2 true and false color composites",
            "Landsat Collection 2 surface reflectance",
        ],
    ),
];

pub fn run() -> Result<()> {
    println!("Applied Geomatics for Natural Resources");
    println!("=======================================");
    for (title, command, topics) in OUTLINE {
        println!();
        println!("{}  (geomatica {})", title, command);
        for topic in *topics {
            println!("  - {}", topic);
        }
    }
    println!();
    println!("Run `geomatica <unit> --help` for the options of each unit.");
    Ok(())
}
