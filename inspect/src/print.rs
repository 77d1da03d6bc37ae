//! Human-readable rendering of a decoded file.

use hxs_format::{hash, shims::Shims, File, Links, ObjId, Value};
use std::{
    collections::HashSet,
    io::{self, Write},
};

const INDENT: &str = "  ";

/// Prints the class table.
pub fn classes(out: &mut impl Write, file: &File) -> io::Result<()> {
    writeln!(out, "classes ({}):", file.header.classes.len())?;
    for (i, class) in file.header.classes.iter().enumerate() {
        write!(
            out,
            "{INDENT}#{i} {} clid={} crc32={:08x}",
            class.name, class.clid, class.crc32
        )?;
        let expected = hash::class_id(&class.name);
        if expected != class.clid {
            write!(out, " (hash {expected})")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Prints every schema with its fields.
pub fn schemas(out: &mut impl Write, file: &File) -> io::Result<()> {
    let links = file.links();
    writeln!(out, "schemas ({}):", file.header.schemas.len())?;
    for (i, schema) in file.header.schemas.iter().enumerate() {
        let class = links
            .class_for_schema(i)
            .and_then(|c| file.class(c))
            .map_or("?", |c| c.name.as_str());
        writeln!(out, "{INDENT}{class} uid={} clid={}", schema.uid, schema.clid)?;
        for (name, ty) in schema.fields() {
            writeln!(out, "{INDENT}{INDENT}{name} : {ty}")?;
        }
    }
    Ok(())
}

/// Prints the shim entries that apply to classes in the file.
pub fn shims(out: &mut impl Write, file: &File, shims: &Shims) -> io::Result<()> {
    let mut matched = 0;
    for class in &file.header.classes {
        let schema = file.schema_for_class(&class.name);
        for (key, ty) in shims.iter() {
            let Some(field) = key
                .strip_prefix(class.name.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                .filter(|field| !field.contains('.'))
            else {
                continue;
            };
            match schema.and_then(|s| s.field(field)) {
                Some(declared) => writeln!(
                    out,
                    "{INDENT}{key} : {ty} (file declares {declared})"
                )?,
                None => writeln!(out, "{INDENT}{key} : {ty}")?,
            }
            matched += 1;
        }
    }
    writeln!(out, "shims ({}): {matched} of {} entries apply", shims.name(), shims.len())
}

/// Prints the object graph under the root. Objects reached a second time print as `@uid`.
pub fn root(out: &mut impl Write, file: &File) -> io::Result<()> {
    let Some(id) = file.root else {
        return writeln!(out, "root: null");
    };
    write!(out, "root: ")?;
    Printer::new(file).object(out, id, 0)?;
    writeln!(out)
}

struct Printer<'a> {
    file: &'a File,
    links: Links,
    seen: HashSet<ObjId>,
}

impl<'a> Printer<'a> {
    fn new(file: &'a File) -> Self {
        Self {
            file,
            links: file.links(),
            seen: HashSet::new(),
        }
    }

    fn object(&mut self, out: &mut impl Write, id: ObjId, depth: usize) -> io::Result<()> {
        let file = self.file;
        let Some(obj) = file.object(id) else {
            return write!(out, "<dangling #{}>", id.index());
        };
        if !self.seen.insert(id) {
            return write!(out, "@{}", obj.uid);
        }
        let class = self
            .links
            .class_for_schema(obj.schema)
            .and_then(|c| file.class(c))
            .map_or("?", |c| c.name.as_str());
        if obj.fields.is_empty() {
            return write!(out, "{class}#{} {{}}", obj.uid);
        }
        writeln!(out, "{class}#{} {{", obj.uid)?;
        for (name, value) in &obj.fields {
            indent(out, depth + 1)?;
            write!(out, "{name}: ")?;
            self.value(out, value, depth + 1)?;
            writeln!(out)?;
        }
        indent(out, depth)?;
        write!(out, "}}")
    }

    fn value(&mut self, out: &mut impl Write, value: &Value, depth: usize) -> io::Result<()> {
        match value {
            Value::Null => write!(out, "null"),
            Value::Int(v) => write!(out, "{v}"),
            Value::Float(v) => write!(out, "{v:?}"),
            Value::Bool(v) => write!(out, "{v}"),
            Value::Int64(v) => write!(out, "{v}L"),
            Value::String(s) => write!(out, "{s:?}"),
            Value::Bytes(b) => {
                write!(out, "0x")?;
                for byte in b.iter() {
                    write!(out, "{byte:02x}")?;
                }
                Ok(())
            }
            Value::Array(items) => {
                write!(out, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    self.value(out, item, depth)?;
                }
                write!(out, "]")
            }
            Value::Map(entries) => {
                write!(out, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    self.value(out, k, depth)?;
                    write!(out, " => ")?;
                    self.value(out, v, depth)?;
                }
                write!(out, "}}")
            }
            Value::Ref(id) => self.object(out, *id, depth),
            Value::Enum { name, index } => write!(out, "{name}#{index}"),
            Value::Obj(fields) => {
                write!(out, "{{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    write!(out, "{}: ", field.name.as_deref().unwrap_or("_"))?;
                    self.value(out, &field.value, depth)?;
                }
                write!(out, " }}")
            }
        }
    }
}

fn indent(out: &mut impl Write, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        out.write_all(INDENT.as_bytes())?;
    }
    Ok(())
}
