//! End-to-end synthesis and erosion on the default 128×128 terrain.

use strata_terrain::{Biome, ErosionPipeline, SynthesisParams, TerrainSynthesizer};

const EPSILON: f32 = 1e-3;

/// `(x, z, height)` samples of seed 12345 at 128×128, height scale 100.
const FIXTURE: [(usize, usize, f32); 8] = [
    (0, 0, 12.340_677),
    (17, 5, 28.155_052),
    (64, 64, 24.868_36),
    (100, 27, 9.517_504),
    (127, 127, 13.093_671),
    (31, 90, 11.022_415),
    (5, 120, 18.008_612),
    (90, 10, 5.879_558),
];

/// Sum of each row `z` of the seed-12345 heightmap.
const ROW_SUMS: [f64; 128] = [
    1_665.963, 1_700.445, 1_699.200, 1_702.551, 1_715.237, 1_770.945,
    1_835.905, 1_865.951, 1_923.995, 1_999.548, 2_105.856, 2_302.844,
    2_447.620, 2_509.923, 2_544.259, 2_555.489, 2_607.775, 2_638.963,
    2_577.231, 2_435.116, 2_367.215, 2_385.208, 2_451.934, 2_513.880,
    2_568.773, 2_551.160, 2_566.307, 2_563.883, 2_505.614, 2_462.957,
    2_499.721, 2_575.033, 2_604.253, 2_612.464, 2_618.802, 2_569.944,
    2_434.804, 2_302.845, 2_190.314, 2_166.445, 2_206.660, 2_172.571,
    2_238.080, 2_396.597, 2_608.440, 2_885.646, 3_178.385, 3_224.586,
    3_143.913, 3_007.454, 2_853.461, 2_732.040, 2_680.921, 2_659.999,
    2_642.315, 2_608.566, 2_547.389, 2_319.418, 2_130.330, 2_024.676,
    1_978.166, 1_998.719, 1_984.520, 1_884.408, 1_780.253, 1_656.317,
    1_526.173, 1_442.706, 1_351.406, 1_277.398, 1_256.930, 1_257.842,
    1_296.809, 1_275.026, 1_169.610, 1_079.841, 1_018.266, 985.229,
    934.764, 841.113, 748.367, 664.252, 610.341, 589.711,
    588.064, 635.165, 742.499, 844.357, 954.484, 916.848,
    971.432, 1_057.145, 1_125.346, 1_171.934, 1_155.925, 1_105.372,
    1_057.224, 990.302, 883.829, 771.766, 754.426, 783.332,
    854.753, 939.156, 1_015.545, 907.385, 888.526, 943.726,
    1_037.236, 1_165.751, 1_207.059, 1_155.805, 1_095.730, 1_034.260,
    954.574, 860.810, 746.862, 655.424, 554.541, 471.292,
    407.732, 382.358, 388.449, 388.782, 403.185, 423.935,
    425.299, 385.521,
];

/// Sum of each column `x` of the seed-12345 heightmap.
const COLUMN_SUMS: [f64; 128] = [
    1_849.947, 1_804.753, 1_701.384, 1_551.467, 1_418.720, 1_341.348,
    1_304.657, 1_233.975, 1_171.637, 1_111.308, 1_120.448, 1_219.186,
    1_301.051, 1_361.067, 1_383.386, 1_348.653, 1_330.315, 1_317.912,
    1_271.486, 1_190.184, 1_168.230, 1_166.680, 1_193.664, 1_244.171,
    1_297.525, 1_278.288, 1_284.945, 1_326.609, 1_422.300, 1_608.532,
    1_820.560, 1_898.362, 1_975.053, 2_036.399, 2_037.358, 1_942.773,
    1_857.860, 1_793.435, 1_775.926, 1_789.331, 1_817.751, 1_778.389,
    1_813.914, 1_882.504, 1_926.035, 2_014.575, 2_166.413, 2_262.562,
    2_264.464, 2_200.347, 2_099.036, 2_014.746, 1_952.618, 1_898.138,
    1_843.036, 1_772.170, 1_756.459, 1_757.991, 1_747.435, 1_747.171,
    1_766.100, 1_794.328, 1_813.527, 1_864.314, 1_957.996, 2_041.115,
    2_099.339, 2_066.130, 2_001.765, 1_949.225, 1_900.430, 1_940.387,
    2_075.052, 2_121.253, 2_142.543, 2_173.411, 2_280.575, 2_367.363,
    2_401.381, 2_370.782, 2_308.422, 2_240.367, 2_159.054, 2_045.642,
    1_976.532, 1_980.470, 1_993.152, 1_965.165, 1_920.375, 1_819.746,
    1_767.411, 1_806.937, 1_878.139, 1_994.430, 2_105.696, 2_089.163,
    1_986.734, 1_863.853, 1_746.413, 1_640.233, 1_560.415, 1_510.261,
    1_471.347, 1_460.481, 1_448.857, 1_389.093, 1_315.706, 1_229.928,
    1_178.309, 1_176.267, 1_197.480, 1_193.949, 1_157.471, 1_130.052,
    1_140.156, 1_110.053, 994.775, 887.069, 835.397, 830.019,
    839.176, 874.774, 946.509, 1_008.814, 1_075.419, 1_176.490,
    1_290.230, 1_379.043,
];

/// Tolerance on a 128-texel sum.
const SUM_EPSILON: f64 = 0.05;

fn default_terrain() -> strata_terrain::SynthesisOutput {
    TerrainSynthesizer::new(SynthesisParams::default())
        .generate()
        .expect("default parameters are valid")
}

#[test]
fn test_default_terrain_matches_fixture() {
    let out = default_terrain();
    for (x, z, expected) in FIXTURE {
        let h = out.field.height_at(x, z);
        assert!(
            (h - expected).abs() < EPSILON,
            "height at ({x}, {z}) = {h}, expected {expected}"
        );
    }
}

#[test]
fn test_every_row_and_column_matches_fixture() {
    let out = default_terrain();
    let field = &out.field;
    for (z, expected) in ROW_SUMS.iter().enumerate() {
        let sum: f64 = (0..128).map(|x| field.height_at(x, z) as f64).sum();
        assert!(
            (sum - expected).abs() < SUM_EPSILON,
            "row {z} sums to {sum}, expected {expected}"
        );
    }
    for (x, expected) in COLUMN_SUMS.iter().enumerate() {
        let sum: f64 = (0..128).map(|z| field.height_at(x, z) as f64).sum();
        assert!(
            (sum - expected).abs() < SUM_EPSILON,
            "column {x} sums to {sum}, expected {expected}"
        );
    }
}

#[test]
fn test_default_terrain_statistics() {
    let out = default_terrain();
    let (lo, hi) = out.field.min_max();
    assert_eq!(lo, 0.0);
    assert!((hi - 52.785).abs() < 0.01, "max height {hi}");

    let volume = out.field.total_volume();
    assert!((volume - 211_189.13).abs() < 1.0, "volume {volume}");

    let flooded = out.field.heights().iter().filter(|&&h| h == 0.0).count();
    assert_eq!(flooded, 1486);
}

#[test]
fn test_generation_is_deterministic() {
    let a = default_terrain();
    let b = default_terrain();
    assert_eq!(a.field, b.field);
    assert_eq!(a.climate, b.climate);
}

#[test]
fn test_every_texel_classified() {
    let out = default_terrain();
    let climate = out.climate.expect("biomes enabled by default");
    let counts = climate.biome_counts();
    assert_eq!(counts.iter().sum::<usize>(), 128 * 128);
    assert!(counts[Biome::Ocean.code() as usize] >= 1486);
    for m in &climate.moisture {
        assert!((0.0..=1.0).contains(m));
    }
}

#[test]
fn test_default_erosion_removes_material() {
    let mut out = default_terrain();
    let report = ErosionPipeline::default().run(&mut out.field, 100.0);

    assert!(
        report.volume_after < report.volume_before,
        "erosion should lose material: {report:?}"
    );
    assert!(report.suspended_sediment > 0.0);
    for &h in out.field.heights() {
        assert!(h.is_finite(), "non-finite height after erosion");
    }
}

#[test]
fn test_lod_meshes_shrink_with_level() {
    let out = default_terrain();
    let full = out.field.generate_mesh(0);
    let half = out.field.generate_mesh(1);
    let quarter = out.field.generate_mesh(2);
    assert_eq!(full.vertex_count(), 128 * 128);
    assert!(half.vertex_count() < full.vertex_count());
    assert!(quarter.vertex_count() < half.vertex_count());
}
