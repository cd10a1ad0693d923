//! Output writers for the finished polygon, the triangulation and the
//! statistics.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::settings::{OutputFormat, Settings};
use crate::stats::{ShapeMetrics, Stats};
use crate::triangulation::{EdgeKind, RingId, Triangulation, VertexId};

/// Write the polygon in the configured format.
pub fn write_polygon(tri: &Triangulation, settings: &Settings) -> Result<()> {
    let path = settings.output_path.as_path();
    match settings.output_format {
        OutputFormat::Dat => write_polygon_dat(tri, path),
        OutputFormat::Line => write_polygon_line(tri, path),
        OutputFormat::Graphml => write_polygon_graphml(tri, path),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Visit the vertices of a ring in boundary order, the first one repeated
/// at the end.
fn ring_cycle(tri: &Triangulation, ring: RingId) -> Vec<VertexId> {
    let start = tri.ring_vertex(ring, 0);
    let mut out = vec![start];
    let mut v = tri.next_vertex(start);
    while v != start {
        out.push(v);
        v = tri.next_vertex(v);
    }
    out.push(start);
    out
}

/// gnuplot-style rings: a quoted header per ring, one `x y` line per
/// vertex with the first vertex repeated, blank lines between rings.
pub fn write_polygon_dat(tri: &Triangulation, path: &Path) -> Result<()> {
    let mut w = create(path)?;

    writeln!(w, "\"outer polygon\"")?;
    for v in ring_cycle(tri, RingId::OUTER) {
        let p = tri.position(v);
        writeln!(w, "{:.6} {:.6}", p.x, p.y)?;
    }

    for i in 1..tri.ring_count() {
        writeln!(w)?;
        writeln!(w)?;
        writeln!(w, "\"inner polygon {}\"", i - 1)?;
        for v in ring_cycle(tri, RingId(i as u32)) {
            let p = tri.position(v);
            writeln!(w, "{:.6} {:.6}", p.x, p.y)?;
        }
    }

    w.flush()?;
    Ok(())
}

/// Line format: per ring the vertex count (including the closing repeat),
/// the vertex lines, and a blank line.
pub fn write_polygon_line(tri: &Triangulation, path: &Path) -> Result<()> {
    let mut w = create(path)?;

    for i in 0..tri.ring_count() {
        let cycle = ring_cycle(tri, RingId(i as u32));
        writeln!(w, "{}", cycle.len())?;
        for v in cycle {
            let p = tri.position(v);
            writeln!(w, "{} {}", p.x, p.y)?;
        }
        writeln!(w)?;
    }

    w.flush()?;
    Ok(())
}

fn write_graphml_header(w: &mut impl Write) -> Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        w,
        r#"<graphml xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns="http://graphml.graphdrawing.org/xmlns" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">
  <key attr.name="vertex-coordinate-x" attr.type="string" for="node" id="x"/>
  <key attr.name="vertex-coordinate-y" attr.type="string" for="node" id="y"/>
  <key attr.name="edge-weight" attr.type="string" for="edge" id="w">
    <default>1.0</default>
  </key>
  <key attr.name="edge-weight-additive" attr.type="string" for="edge" id="wa">
    <default>0.0</default>
  </key>
  <graph edgedefault="undirected">"#
    )?;
    Ok(())
}

fn write_graphml_node(w: &mut impl Write, tri: &Triangulation, v: VertexId) -> Result<()> {
    let p = tri.position(v);
    writeln!(
        w,
        r#"    <node id="n{}"><data key="x">{}</data><data key="y">{}</data></node>"#,
        v.idx(),
        p.x,
        p.y
    )?;
    Ok(())
}

fn write_graphml_footer(w: &mut impl Write) -> Result<()> {
    writeln!(w, "  </graph>")?;
    writeln!(w, "</graphml>")?;
    Ok(())
}

/// The polygon as graphml: every vertex (frame corners included) and the
/// polygon edges.
pub fn write_polygon_graphml(tri: &Triangulation, path: &Path) -> Result<()> {
    let mut w = create(path)?;
    write_graphml_header(&mut w)?;

    if let Some(corners) = tri.frame() {
        for v in corners {
            write_graphml_node(&mut w, tri, v)?;
        }
    }
    for &v in tri.vertex_order() {
        write_graphml_node(&mut w, tri, v)?;
    }

    for e in tri.live_edges() {
        if tri.edge_kind(e) != EdgeKind::Polygon {
            continue;
        }
        let (v0, v1) = tri.edge_vertices(e);
        writeln!(w, r#"    <edge source="n{}" target="n{}"/>"#, v0.idx(), v1.idx())?;
    }

    write_graphml_footer(&mut w)?;
    w.flush()?;
    Ok(())
}

/// The full triangulation as graphml: every vertex and every live edge.
pub fn write_triangulation_graphml(tri: &Triangulation, path: &Path) -> Result<()> {
    let mut w = create(path)?;
    write_graphml_header(&mut w)?;

    if let Some(corners) = tri.frame() {
        for v in corners {
            write_graphml_node(&mut w, tri, v)?;
        }
    }
    for &v in tri.vertex_order() {
        write_graphml_node(&mut w, tri, v)?;
    }

    for e in tri.live_edges() {
        let (v0, v1) = tri.edge_vertices(e);
        writeln!(w, r#"    <edge source="n{}" target="n{}"/>"#, v0.idx(), v1.idx())?;
    }

    write_graphml_footer(&mut w)?;
    w.flush()?;
    Ok(())
}

/// Statistics XML: one `<statistics>` root with the polygon makeup, the
/// translation counters and the shape metrics.
pub fn write_stats_xml(
    tri: &Triangulation,
    settings: &Settings,
    stats: &Stats,
    shape: &ShapeMetrics,
    path: &Path,
) -> Result<()> {
    let mut w = create(path)?;

    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(w, "<statistics>")?;

    writeln!(
        w,
        r#"  <polygon vertices="{}" outersize="{}" holes="{}">"#,
        tri.vertex_count(),
        tri.ring_len(RingId::OUTER),
        tri.inner_ring_count()
    )?;
    for i in 1..tri.ring_count() {
        writeln!(
            w,
            r#"    <hole id="{}" size="{}"/>"#,
            i - 1,
            tri.ring_len(RingId(i as u32))
        )?;
    }
    writeln!(w, "  </polygon>")?;

    writeln!(
        w,
        r#"  <translations tries="{}" performed="{}" splits="{}" partials="{}" undone="{}" rejected="{}" insertions="{}" checks="{}" checktriangles="{}" maxchecktriangles="{}"/>"#,
        stats.translation_tries,
        stats.translations_performed,
        stats.splits,
        stats.partials,
        stats.undone,
        stats.rejected,
        stats.insertions,
        stats.walk_checks,
        stats.walk_triangles,
        stats.walk_max_triangles,
    )?;

    writeln!(
        w,
        r#"  <shape twistnumber="{}" mintwist="{:.6}" maxtwist="{:.6}" twistamplitude="{:.6}" radialdeviation="{:.6}" initialradius="{:.6}" boxsize="{:.6}"/>"#,
        shape.twist_number,
        shape.twist_min,
        shape.twist_max,
        shape.amplitude(),
        shape.radial_deviation,
        settings.radius_polygon,
        settings.box_size,
    )?;

    writeln!(w, "</statistics>")?;
    w.flush()?;
    Ok(())
}
