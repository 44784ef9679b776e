//!
//! # SiEPIC21 Unit Tests
//!

// Crates.io
use rstest::rstest;

// Local imports
use super::*;
use crate::components::GRATING_COUPLERS;
use crate::raw::{
    Cell, Element, LayerSpec, Library, Path, Point, Rect, TextElement, UmPoint, Units,
};
use crate::utils::{Ptr, SerdeFile, SerializationFormat};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Add a pin from `p1` to `p2` (nm) of `width` on `layer`
fn pin(cell: &mut Cell, p1: (isize, isize), p2: (isize, isize), width: usize, layer: LayerSpec) {
    let path = Path::new(vec![Point::new(p1.0, p1.1), Point::new(p2.0, p2.1)], width);
    cell.layout.elems.push(Element::new(layer, path));
}
/// Add a label `text` at `loc` (nm)
fn label(cell: &mut Cell, text: &str, loc: (isize, isize)) {
    cell.layout
        .labels
        .push(TextElement::new(text, Point::new(loc.0, loc.1), PORT));
}
fn annotate(cell: &mut Cell) -> PdkResult<usize> {
    add_ports_from_siepic_pins(cell, &PinLayers::default(), Units::Nano)
}

#[test]
fn single_pin() -> PdkResult<()> {
    init_logging();
    let mut cell = Cell::new("wg");
    pin(&mut cell, (0, 0), (2_000, 0), 500, PORT);
    label(&mut cell, "opt1", (1_000, 0));
    assert_eq!(annotate(&mut cell)?, 1);

    let port = cell.ports.get("opt1")?;
    assert!(port.center.isclose(&UmPoint::new(1.0, 0.0)));
    assert_eq!(port.orientation, 0);
    assert_eq!(port.width, 0.5);
    assert_eq!(port.port_type, PortType::Optical);
    assert_eq!(port.layer, WG);
    Ok(())
}
#[test]
fn label_at_either_end() -> PdkResult<()> {
    let mut cell = Cell::new("wg");
    pin(&mut cell, (0, 0), (0, 100), 500, PORT);
    pin(&mut cell, (5_000, 0), (5_000, -100), 500, PORTE);
    label(&mut cell, "north", (0, 100));
    label(&mut cell, "south", (5_000, 0));
    assert_eq!(annotate(&mut cell)?, 2);

    let north = cell.ports.get("north")?;
    assert_eq!(north.orientation, 90);
    assert!(north.center.isclose(&UmPoint::new(0.0, 0.05)));
    let south = cell.ports.get("south")?;
    assert_eq!(south.orientation, 270);
    assert_eq!(south.port_type, PortType::Electrical);
    // No electrical port layer is configured; the pin layer stands in
    assert_eq!(south.layer, PORTE);
    Ok(())
}
#[test]
fn first_pin_claims_label() -> PdkResult<()> {
    init_logging();
    // Both pins end at (1000, 0), where the only label sits
    let mut cell = Cell::new("wg");
    pin(&mut cell, (0, 0), (1_000, 0), 500, PORT);
    pin(&mut cell, (2_000, 0), (1_000, 0), 500, PORT);
    label(&mut cell, "opt2", (1_000, 0));
    assert_eq!(annotate(&mut cell)?, 1);
    assert_eq!(cell.ports.names(), vec!["opt2"]);
    let port = cell.ports.get("opt2")?;
    assert!(port.center.isclose(&UmPoint::new(0.5, 0.0)));
    assert_eq!(port.orientation, 0);
    Ok(())
}
#[test]
fn duplicate_labels() -> PdkResult<()> {
    let mut cell = Cell::new("splitter");
    pin(&mut cell, (0, 0), (-100, 0), 500, PORT);
    pin(&mut cell, (0, 2_000), (-100, 2_000), 500, PORT);
    pin(&mut cell, (0, 4_000), (-100, 4_000), 500, PORT);
    label(&mut cell, "o1", (-50, 0));
    label(&mut cell, "o1", (-50, 2_000));
    label(&mut cell, "o1", (-50, 4_000));
    assert_eq!(annotate(&mut cell)?, 3);
    let mut names = cell.ports.names();
    names.sort();
    assert_eq!(names, vec!["o1", "o1_1", "o1_2"]);
    // First-seen order picks the suffixes
    assert!(cell.ports.get("o1_1")?.center.isclose(&UmPoint::new(-0.05, 2.0)));
    Ok(())
}
#[test]
fn non_pins_ignored() -> PdkResult<()> {
    init_logging();
    let mut cell = Cell::new("wg");
    // A waveguide path whose midpoint sits on the label. It must not claim it.
    pin(&mut cell, (0, 0), (2_000, 0), 500, WG);
    cell.layout.elems.push(Element::new(
        PORT,
        Rect::new(Point::new(0, 0), Point::new(10, 10)),
    ));
    pin(&mut cell, (1_000, 0), (1_000, 0), 500, PORT);
    cell.layout.elems.push(Element::new(PORT, Path::new(vec![Point::new(1, 1)], 500)));
    pin(&mut cell, (0, 0), (2_000, 0), 500, PORT);
    label(&mut cell, "opt1", (1_000, 0));
    assert_eq!(annotate(&mut cell)?, 1);
    // The degenerate pin was found first, and oriented by guess
    assert_eq!(cell.ports.names(), vec!["opt1"]);
    assert_eq!(cell.ports.get("opt1")?.orientation, 180);
    Ok(())
}
#[test]
fn unlabeled_pin_skipped() -> PdkResult<()> {
    init_logging();
    let mut cell = Cell::new("wg");
    pin(&mut cell, (0, 0), (100, 0), 500, PORT);
    label(&mut cell, "far", (50_000, 50_000));
    assert_eq!(annotate(&mut cell)?, 0);
    assert!(cell.ports.is_empty());
    Ok(())
}
#[test]
fn canonical_and_deterministic() -> PdkResult<()> {
    let build = || {
        let mut cell = Cell::new("crossing");
        pin(&mut cell, (0, 0), (-100, 0), 500, PORT);
        pin(&mut cell, (3_000, 3_000), (3_000, 3_100), 500, PORT);
        pin(&mut cell, (6_000, 0), (6_100, 0), 500, PORT);
        pin(&mut cell, (3_000, -3_000), (3_000, -3_100), 500, PORT);
        label(&mut cell, "opt1", (-50, 0));
        label(&mut cell, "opt2", (3_000, 3_050));
        label(&mut cell, "opt3", (6_050, 0));
        label(&mut cell, "opt4", (3_000, -3_050));
        cell
    };
    let (mut a, mut b) = (build(), build());
    annotate(&mut a)?;
    annotate(&mut b)?;
    assert_eq!(a.ports, b.ports);
    assert_eq!(a.ports.names(), vec!["opt3", "opt2", "opt1", "opt4"]);
    let orientations: Vec<i32> = a.ports.iter().map(|p| p.orientation).collect();
    assert_eq!(orientations, vec![0, 90, 180, 270]);
    Ok(())
}

#[rstest]
#[case("ebeam_gc_te1550", "opt1", (-5.0, 0.0), 1, Orientation::East)]
#[case("ebeam_y_1550", "opt1", (5.0, 0.0), 3, Orientation::West)]
#[case("ebeam_crossing4", "opt2", (0.0, 4.8), 4, Orientation::North)]
#[case("ebeam_crossing4", "opt4", (0.0, -4.8), 4, Orientation::South)]
#[case("ebeam_crossing4", "opt3", (4.8, 0.0), 4, Orientation::East)]
#[case("ebeam_bdc_te1550", "opt2", (5.0, 2.0), 4, Orientation::West)]
#[case("ebeam_bdc_te1550", "opt4", (-5.0, 2.0), 4, Orientation::East)]
#[case("ebeam_y_1550", "opt2", (0.0, 1.0), 3, Orientation::West)]
#[case("ebeam_y_1550", "opt3", (7.4, -1.0), 3, Orientation::East)]
fn guess_orientation(
    #[case] name: &str,
    #[case] label: &str,
    #[case] position: (f64, f64),
    #[case] n: usize,
    #[case] expected: Orientation,
) {
    let position = UmPoint::new(position.0, position.1);
    assert_eq!(guess_port_orientation(position, name, label, n), expected);
}
#[test]
fn guess_orientation_total() {
    let names = ["gc", "crossing", "other"];
    let labels = ["opt1", "opt2", "opt3", "opt4", "x"];
    let positions = [(-1.0, -1.0), (0.0, 0.0), (1.0, 1.0), (1.0, -1.0)];
    for name in names {
        for label in labels {
            for (x, y) in positions {
                for n in 0..6 {
                    let deg = guess_port_orientation(UmPoint::new(x, y), name, label, n).degrees();
                    assert!([0, 90, 180, 270].contains(&deg));
                }
            }
        }
    }
}

/// Write `comp`'s hierarchy to `dir/filename`
fn write_fixture(dir: &std::path::Path, filename: &str, comp: &Component) -> PdkResult<()> {
    comp.save_gds(dir.join(filename), Units::Nano)
}
fn pdk_in(dir: &std::path::Path) -> Pdk {
    let config = PdkConfig {
        gds_dir: dir.to_path_buf(),
        ..Default::default()
    };
    Pdk::new(config, Technology::ebeam())
}

#[test]
fn gds_roundtrip_ports() -> PdkResult<()> {
    init_logging();
    let tech = Technology::ebeam();
    let dir = tempfile::tempdir().map_err(|e| PdkError::Config(e.to_string()))?;
    for comp in [
        components::straight(&tech, 10.0)?,
        components::dc_halfring_straight(&tech, 0.2, 5.0, 4.0)?,
        components::ring_single(&tech, 0.2, 10.0, 4.0, 0.6)?,
    ] {
        let name = comp.name()?;
        let filename = format!("{name}.gds");
        write_fixture(dir.path(), &filename, &comp)?;
        let imported =
            import_fixture(&dir.path().join(&filename), Some(name.as_str()), &tech, false)?;
        let imported = imported.read()?;

        let mut expected = comp.ports()?;
        expected.canonicalize();
        assert_eq!(imported.ports.names(), expected.names());
        for (got, want) in imported.ports.iter().zip(expected.iter()) {
            assert!(got.center.isclose(&want.center), "{:?} != {:?}", got, want);
            assert_eq!(got.orientation, want.orientation);
            assert!((got.width - want.width).abs() < 1e-9);
            assert_eq!(got.port_type, want.port_type);
            assert_eq!(got.layer, want.layer);
        }
    }
    Ok(())
}
#[test]
fn fixture_cache() -> PdkResult<()> {
    init_logging();
    let dir = tempfile::tempdir().map_err(|e| PdkError::Config(e.to_string()))?;
    let mut pdk = pdk_in(dir.path());
    let wg = components::straight(pdk.tech(), 5.0)?;
    write_fixture(dir.path(), "ebeam_y_1550.gds", &wg)?;

    let first = pdk.cell("ebeam_y_1550")?;
    let second = pdk.fixture("ebeam_y_1550.gds", None)?;
    assert_eq!(first.cell, second.cell);
    assert_eq!(pdk.cache().len(), 1);
    assert!(pdk.cache().contains(&FixtureKey::new("ebeam_y_1550.gds", None)));
    assert_eq!(
        first.info,
        Info::Fixture {
            model: "ebeam_y_1550".into(),
            library: FIXTURE_LIBRARY.into(),
        }
    );
    // Renamed clockwise from the west
    assert_eq!(first.ports()?.names(), vec!["o2", "o1"]);
    assert_eq!(first.port("o1")?.orientation, 180);

    // Same file, cell picked by name: a distinct entry
    let named = pdk.fixture("ebeam_y_1550.gds", Some("straight_L5"))?;
    assert_ne!(named.cell, first.cell);
    assert_eq!(pdk.cache().len(), 2);
    Ok(())
}
#[test]
fn fixture_errors() -> PdkResult<()> {
    let dir = tempfile::tempdir().map_err(|e| PdkError::Config(e.to_string()))?;
    let mut pdk = pdk_in(dir.path());
    assert!(matches!(
        pdk.cell("ebeam_crossing4"),
        Err(PdkError::FixtureNotFound(_))
    ));
    assert!(pdk.cache().is_empty());
    assert!(matches!(pdk.cell("no_such_cell"), Err(PdkError::UnknownCell(_))));

    // Two top cells, and no name to pick between them
    let tech = Technology::ebeam();
    let mut lib = Library::new("two", Units::Nano);
    lib.add_hierarchy(&components::straight(&tech, 1.0)?.cell)?;
    lib.add_hierarchy(&components::straight(&tech, 2.0)?.cell)?;
    let path = dir.path().join("two.gds");
    lib.save(&path)?;
    assert!(import_fixture(&path, None, &tech, true).is_err());
    assert!(import_fixture(&path, Some("straight_L2"), &tech, true).is_ok());
    assert!(matches!(
        import_fixture(&path, Some("straight_L3"), &tech, true),
        Err(PdkError::UnknownCell(_))
    ));

    // Wrong units
    let mut lib = Library::new("micro", Units::Micro);
    lib.add_hierarchy(&Ptr::new(Cell::new("empty")))?;
    let path = dir.path().join("micro.gds");
    lib.save(&path)?;
    assert!(matches!(
        import_fixture(&path, None, &tech, true),
        Err(PdkError::Layout(_))
    ));
    Ok(())
}
#[test]
fn grating_coupler() -> PdkResult<()> {
    init_logging();
    let dir = tempfile::tempdir().map_err(|e| PdkError::Config(e.to_string()))?;
    let mut pdk = pdk_in(dir.path());

    // A stand-in coupler: body to the west, waveguide port at the origin facing east
    let mut cell = Cell::new("ebeam_gc_te1550");
    cell.layout.elems.push(Element::new(
        WG,
        Rect::new(Point::new(-30_000, -5_000), Point::new(0, 5_000)),
    ));
    pin(&mut cell, (-50, 0), (50, 0), 500, PORT);
    label(&mut cell, "opt1", (0, 0));
    let mut lib = Library::new("gc", Units::Nano);
    lib.add_hierarchy(&Ptr::new(cell))?;
    lib.save(dir.path().join("ebeam_gc_te1550.gds"))?;

    let gc = pdk.cell("gc_te1550")?;
    assert_eq!(gc.name()?, "gc_te1550");
    assert_eq!(gc.ports()?.names(), vec!["o1", "o2"]);
    let o1 = gc.port("o1")?;
    assert_eq!(o1.orientation, 180);
    assert!(o1.center.isclose(&UmPoint::new(0.0, 0.0)));
    let o2 = gc.port("o2")?;
    assert_eq!(o2.port_type, PortType::Fiber);
    assert_eq!(o2.center, UmPoint::new(25.0, 0.0));
    assert_eq!(o2.width, 9.0);
    assert_eq!(gc.info.optical_io(), Some((Polarization::Te, 1.55)));

    // Mirrored across the y-axis: the body now lies east of the origin
    let bbox = gc.cell.read()?.layout.bbox()?;
    assert!(bbox.p0.x >= -1_000);
    assert!(bbox.p1.x >= 30_000);

    // Cached, both as fixture and as mirrored coupler
    let again = pdk.cell("gc_te1550")?;
    assert_eq!(again.cell, gc.cell);
    assert_eq!(pdk.cache().len(), 2);
    assert!(pdk
        .cache()
        .contains(&FixtureKey::new("ebeam_gc_te1550.gds", None).mirrored()));

    // Labels
    let text = pdk.input_label_text(&gc, "ring_single")?;
    assert_eq!(text, "opt_in_TE_1550_device_YourUserName-ring.single");
    let label = pdk.input_labels(&gc, "o1", "ring_single")?;
    assert_eq!(label.string, text);
    assert_eq!(label.loc, Point::new(0, 0));
    assert_eq!(label.layer, LABEL);
    let wg = pdk.cell("straight")?;
    assert!(matches!(
        pdk.input_label_text(&wg, "x"),
        Err(PdkError::InvalidParameter { .. })
    ));
    Ok(())
}
#[test]
fn config_fixed_at_construction() -> PdkResult<()> {
    // A fixture with SiEPIC-style port names
    let dir = tempfile::tempdir().map_err(|e| PdkError::Config(e.to_string()))?;
    let mut cell = Cell::new("ebeam_terminator_te1550");
    pin(&mut cell, (50, 0), (-50, 0), 500, PORT);
    label(&mut cell, "opt1", (0, 0));
    let mut lib = Library::new("term", Units::Nano);
    lib.add_hierarchy(&Ptr::new(cell))?;
    lib.save(dir.path().join("ebeam_terminator_te1550.gds"))?;

    let keep_names = PdkConfig {
        gds_dir: dir.path().to_path_buf(),
        rename_ports: false,
        ..Default::default()
    };
    let mut pdk = Pdk::new(keep_names, Technology::ebeam());
    assert!(!pdk.config().rename_ports);
    let term = pdk.cell("ebeam_terminator_te1550")?;
    assert_eq!(term.ports()?.names(), vec!["opt1"]);
    // Served from the cache under the same settings
    assert_eq!(pdk.cell("ebeam_terminator_te1550")?.cell, term.cell);

    // Renaming takes a separately-configured PDK, with its own cache
    let mut renaming = pdk_in(dir.path());
    let renamed = renaming.cell("ebeam_terminator_te1550")?;
    assert_eq!(renamed.ports()?.names(), vec!["o1"]);
    assert_ne!(renamed.cell, term.cell);
    assert_eq!(term.ports()?.names(), vec!["opt1"]);
    Ok(())
}
#[test]
fn registry() -> PdkResult<()> {
    let names = Pdk::cell_names();
    assert_eq!(names.len(), 35);
    for gc in GRATING_COUPLERS {
        assert!(names.contains(&gc.name));
    }
    let mut pdk = Pdk::default();
    for name in components::PARAMETRIC {
        let comp = pdk.cell(name)?;
        assert!(!comp.ports()?.is_empty());
        comp.assert_ports_on_grid(pdk.tech().units)?;
    }
    // Parametric cells are not cached
    assert!(pdk.cache().is_empty());
    Ok(())
}
#[test]
fn remove_pins_component() -> PdkResult<()> {
    let tech = Technology::ebeam();
    let ring = components::ring_single(&tech, 0.2, 10.0, 4.0, 0.6)?;
    let clean = ring.remove_pins(&tech)?;
    let markers = tech.marker_layers();
    assert!(clean
        .flat_elements()?
        .iter()
        .all(|e| !markers.contains(&e.layer)));
    assert!(ring.flat_elements()?.iter().any(|e| e.layer == DEVREC));
    assert_eq!(clean.ports()?, ring.ports()?);
    // Nothing left to strip
    let again = clean.remove_pins(&tech)?;
    assert_eq!(again.flat_elements()?, clean.flat_elements()?);
    Ok(())
}
#[test]
fn mirror_and_flatten() -> PdkResult<()> {
    let tech = Technology::ebeam();
    let coupler = components::dc_halfring_straight(&tech, 0.2, 5.0, 4.0)?;
    let mirrored = coupler.mirror(tech.units)?;
    assert_eq!(mirrored.name()?, format!("{}_mirror", coupler.name()?));
    // Symmetric about the y-axis: the same port set, relabeled
    let o1 = mirrored.port("o1")?;
    assert!(o1.center.isclose(&UmPoint::new(7.0, 0.0)));
    assert_eq!(o1.orientation, 0);
    assert_eq!(mirrored.port("o2")?.orientation, 90);

    let flat = mirrored.flatten()?;
    assert!(flat.cell.read()?.layout.insts.is_empty());
    assert_eq!(flat.flat_elements()?.len(), coupler.flat_elements()?.len());
    assert_eq!(flat.ports()?, mirrored.ports()?);
    Ok(())
}
/// Full path of checked-in resource file `rname`
fn resource(rname: &str) -> String {
    format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), rname)
}

#[rstest]
#[case("straight", 4)]
#[case("pad", 2)]
#[case("dbr", 203)]
#[case("dc_halfring_straight", 7)]
#[case("ring_single", 11)]
fn golden_settings(#[case] name: &str, #[case] flat_elements: usize) -> PdkResult<()> {
    let mut pdk = Pdk::default();
    let comp = pdk.cell(name)?;
    let settings = comp.settings()?;
    let golden_path = resource(&format!("{name}.golden.yaml"));

    // Un-comment to update the golden file.
    // settings.save(SerializationFormat::Yaml, &golden_path)?;

    let golden = Settings::open(&golden_path, SerializationFormat::Yaml)?;
    assert_eq!(settings.name, golden.name);
    assert_eq!(settings.info, golden.info);
    assert_eq!(settings.ports.len(), golden.ports.len());
    for (got, want) in settings.ports.iter().zip(golden.ports.iter()) {
        assert_eq!(got.name, want.name);
        assert!(got.center.isclose(&want.center), "{:?} != {:?}", got, want);
        assert_eq!(got.width, want.width);
        assert_eq!(got.orientation, want.orientation);
        assert_eq!(got.port_type, want.port_type);
        assert_eq!(got.layer, want.layer);
    }
    assert_eq!(comp.flat_elements()?.len(), flat_elements);
    Ok(())
}
#[test]
fn settings_snapshot() -> PdkResult<()> {
    let tech = Technology::ebeam();
    let wg = components::straight(&tech, 2.5)?;
    let settings = wg.settings()?;
    assert_eq!(settings.name, "straight_L2.5");
    assert_eq!(settings.ports.len(), 2);

    let dir = tempfile::tempdir().map_err(|e| PdkError::Config(e.to_string()))?;
    for fmt in [SerializationFormat::Yaml, SerializationFormat::Json] {
        let path = dir.path().join("settings");
        settings.save(fmt, &path)?;
        assert_eq!(Settings::open(&path, fmt)?, settings);
    }
    Ok(())
}
#[test]
fn config() -> PdkResult<()> {
    let mut cfg = PdkConfig::default();
    assert!(cfg.rename_ports);
    cfg.apply_overrides(|var| match var {
        GDS_DIR_VAR => Some("/tmp/ebeam".into()),
        USERNAME_VAR => Some("someone".into()),
        _ => None,
    });
    assert_eq!(cfg.gds_dir, std::path::PathBuf::from("/tmp/ebeam"));
    assert_eq!(cfg.username, "someone");
    assert_eq!(
        cfg.fixture_path("ebeam_y_1550.gds"),
        std::path::PathBuf::from("/tmp/ebeam/ebeam_y_1550.gds")
    );

    let parsed: PdkConfig = SerializationFormat::Toml.from_str(
        r#"
        username = "toml"
        rename_ports = false
        "#,
    )?;
    assert_eq!(parsed.username, "toml");
    assert!(!parsed.rename_ports);
    assert_eq!(parsed.gds_dir, PdkConfig::default().gds_dir);

    let dir = tempfile::tempdir().map_err(|e| PdkError::Config(e.to_string()))?;
    let path = dir.path().join("pdk.yaml");
    parsed.save(SerializationFormat::Yaml, &path)?;
    let loaded = PdkConfig::load(&path)?;
    assert!(!loaded.rename_ports);
    Ok(())
}
