// tests/import_broker.rs
//! End-to-end behaviour of the importer facade against the in-memory mocks.

use ferry::{
    ForeignImporter, Generation, HostContext, HostDeclKind, ImportError, ImporterOptions,
    HostDeclId, LookupKind, ModuleRef, NominalTypeRef, Symbol, WrapperId,
};
use ferry_import::foreign::{ForeignDeclKind, TagKind};
use ferry_import::testing::{MockDeclImporter, MockFactory, MockForeign, MockHost};

type Importer = ForeignImporter<MockHost, MockDeclImporter>;

fn importer(foreign: MockForeign) -> Importer {
    ForeignImporter::new(Box::new(foreign), MockHost::new(), MockDeclImporter::new())
}

fn load(importer: &mut Importer, dotted: &str) -> Result<WrapperId, ImportError> {
    let path: Vec<Symbol> = dotted
        .split('.')
        .map(|segment| importer.host_mut().intern(segment))
        .collect();
    importer.load_module(&path)
}

fn lookup(importer: &mut Importer, text: &str) -> Vec<ferry::HostDecl> {
    let name = importer.host_mut().intern(text);
    importer
        .lookup_value(None, &[], name, LookupKind::Unqualified)
        .into_vec()
}

#[test]
fn mutual_reexports_force_each_module_once() {
    let mut foreign = MockForeign::new();
    let a = foreign.add_module("A", None);
    let b = foreign.add_module("B", None);
    foreign.add_export(a, b);
    foreign.add_export(b, a);
    let mut importer = importer(foreign);

    let wa = load(&mut importer, "A").unwrap();
    assert_eq!(importer.generation(), Generation::new(1));
    assert_eq!(importer.session().cache().len(), 2);

    let wb = load(&mut importer, "B").unwrap();
    assert_ne!(wa, wb);
    assert_eq!(importer.generation(), Generation::new(2));

    for _ in 0..3 {
        assert_eq!(load(&mut importer, "A").unwrap(), wa);
        assert_eq!(load(&mut importer, "B").unwrap(), wb);
    }
    assert_eq!(importer.generation(), Generation::new(2));
    assert_eq!(importer.session().stats().forcing_runs, 2);
    assert_eq!(importer.session().cache().len(), 2);
    assert_eq!(importer.first_module(), Some(wa));
}

#[test]
fn generation_only_moves_forward() {
    let mut foreign = MockForeign::new();
    for name in ["Darwin", "zlib", "Foundation"] {
        foreign.add_module(name, None);
    }
    let mut importer = importer(foreign);

    let mut last = importer.generation();
    for name in ["Darwin", "zlib", "Darwin", "Nope", "Foundation", "zlib"] {
        let _ = load(&mut importer, name);
        let now = importer.generation();
        assert!(now >= last);
        last = now;
    }
    assert_eq!(last, Generation::new(3));
    assert_eq!(importer.host().generation_bumps, 3);
}

#[test]
fn declarations_map_back_to_the_loaded_wrapper() {
    let mut foreign = MockForeign::new();
    let darwin = foreign.add_module("Darwin", None);
    let stdio = foreign.add_module("stdio", Some(darwin));
    let printf = foreign.add_decl("printf", ForeignDeclKind::Function, Some(stdio));
    let mut importer = importer(foreign);

    let loaded = load(&mut importer, "Darwin").unwrap();
    let results = lookup(&mut importer, "printf");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].module, ModuleRef::Wrapper(loaded));
    assert_eq!(importer.module_for_decl(printf), Some(loaded));
}

#[test]
fn point_resolves_to_one_type() {
    let mut foreign = MockForeign::new();
    let geometry = foreign.add_module("Geometry", None);
    let tag = foreign.add_decl("Point", ForeignDeclKind::Tag(TagKind::Struct), Some(geometry));
    let mut importer = importer(foreign);

    // Only the tag exists: found through the tag namespace.
    let results = lookup(&mut importer, "Point");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, HostDeclKind::Type);
    assert_eq!(importer.decls().host_decl_for(tag), Some(results[0]));
}

#[test]
fn typedef_shadows_its_tag() {
    let mut foreign = MockForeign::new();
    let geometry = foreign.add_module("Geometry", None);
    let tag = foreign.add_decl("Point", ForeignDeclKind::Tag(TagKind::Struct), Some(geometry));
    let typedef = foreign.add_decl("Point", ForeignDeclKind::Typedef, Some(geometry));
    let mut importer = importer(foreign);

    let results = lookup(&mut importer, "Point");
    assert_eq!(results.len(), 1);
    assert_eq!(importer.decls().host_decl_for(typedef), Some(results[0]));
    assert_eq!(importer.decls().host_decl_for(tag), None);
}

#[test]
fn proto_suffix_finds_the_protocol() {
    let mut foreign = MockForeign::new();
    let widgets = foreign.add_module("Widgets", None);
    let class = foreign.add_decl(
        "Widget",
        ForeignDeclKind::Interface { definition: None },
        Some(widgets),
    );
    let protocol = foreign.add_decl("Widget", ForeignDeclKind::Protocol, Some(widgets));
    let mut importer = importer(foreign);

    let proto = lookup(&mut importer, "WidgetProto");
    assert_eq!(proto.len(), 1);
    assert_eq!(importer.decls().host_decl_for(protocol), Some(proto[0]));
    assert_eq!(importer.decls().host_decl_for(class), None);
}

#[test]
fn reserved_words_never_surface() {
    let mut foreign = MockForeign::new();
    let darwin = foreign.add_module("Darwin", None);
    foreign.add_decl("true", ForeignDeclKind::Variable, Some(darwin));
    foreign.add_decl("false", ForeignDeclKind::Variable, Some(darwin));
    let mut importer = importer(foreign);

    assert!(lookup(&mut importer, "true").is_empty());
    let mut seen = Vec::new();
    importer.lookup_visible_decls(&mut |decl| seen.push(decl));
    assert!(seen.is_empty());
}

#[test]
fn visible_decls_respect_module_filter() {
    let mut foreign = MockForeign::new();
    let darwin = foreign.add_module("Darwin", None);
    let zlib = foreign.add_module("zlib", None);
    foreign.add_decl("puts", ForeignDeclKind::Function, Some(darwin));
    foreign.add_decl("fputs", ForeignDeclKind::Function, Some(darwin));
    foreign.add_decl("inflate", ForeignDeclKind::Function, Some(zlib));
    let mut importer = importer(foreign);

    let zlib_wrapper = load(&mut importer, "zlib").unwrap();
    let mut all = Vec::new();
    importer.lookup_visible_decls(&mut |decl| all.push(decl));
    assert_eq!(all.len(), 3);

    let mut filtered = Vec::new();
    importer.lookup_visible_decls_in(ModuleRef::Wrapper(zlib_wrapper), &mut |decl| {
        filtered.push(decl)
    });
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].module, ModuleRef::Wrapper(zlib_wrapper));

    let mut raw = 0;
    importer.lookup_visible_foreign_decls(&mut |_| raw += 1);
    assert_eq!(raw, 3);
}

#[test]
fn extensions_load_for_foreign_classes() {
    let mut foreign = MockForeign::new();
    let appkit = foreign.add_module("AppKit", None);
    let view = foreign.add_decl(
        "NSView",
        ForeignDeclKind::Interface { definition: None },
        Some(appkit),
    );
    foreign.add_category(view, "NSViewLayout", Some(appkit));
    let mut importer = importer(foreign);

    let before = importer.generation();
    let nominal = NominalTypeRef {
        decl: HostDeclId::new(0),
        foreign_decl: Some(view),
    };
    assert_eq!(importer.load_extensions(nominal, before), 1);

    let native = NominalTypeRef {
        decl: HostDeclId::new(1),
        foreign_decl: None,
    };
    assert_eq!(importer.load_extensions(native, before), 0);
}

#[test]
fn adapter_collision_fails_the_load() {
    let mut foreign = MockForeign::new();
    foreign.add_module("Widgets", None);
    let app = foreign.add_module("App", None);
    let shadow = foreign.add_module("Widgets", None);
    foreign.add_export(app, shadow);
    let mut importer = importer(foreign);
    let first = importer.host_mut().add_adapter("Widgets");
    importer.host_mut().add_adapter("Widgets");

    let widgets = load(&mut importer, "Widgets").unwrap();
    assert_eq!(
        importer.adapter_module(widgets),
        Ok(Some(ModuleRef::Host(first)))
    );

    let generation = importer.generation();
    let err = load(&mut importer, "App").unwrap_err();
    assert!(matches!(err, ImportError::AdapterNameCollision { .. }));
    assert!(!err.is_soft());

    // The failed load leaves nothing behind, so a retry fails the same way.
    let retry = load(&mut importer, "App").unwrap_err();
    assert_eq!(retry, err);
    assert_eq!(importer.generation(), generation);
    assert!(!importer.session().cache().is_forced(app));
    let app_name = importer.host_mut().intern("App");
    assert_eq!(importer.session().loaded_module(app_name), None);

    let name = importer.host_mut().intern("Widgets");
    assert_eq!(
        importer.session().loaded_module(name),
        Some(ModuleRef::Host(first))
    );
}

#[test]
fn adapters_stand_in_for_reexports() {
    let mut foreign = MockForeign::new();
    let cocoa = foreign.add_module("Cocoa", None);
    let appkit = foreign.add_module("AppKit", None);
    let foundation = foreign.add_module("Foundation", None);
    foreign.add_export(cocoa, appkit);
    foreign.add_export(cocoa, foundation);
    let mut importer = importer(foreign);
    let overlay = importer.host_mut().add_adapter("Foundation");

    let root = load(&mut importer, "Cocoa").unwrap();
    let exports = importer.reexported_modules(root).unwrap();
    let appkit_wrapper = importer.session().cache().get(appkit).unwrap();
    assert_eq!(
        exports.as_slice(),
        [
            ModuleRef::Wrapper(appkit_wrapper),
            ModuleRef::Host(overlay)
        ]
    );
}

#[test]
fn create_builds_the_expected_invocation() {
    let resources = tempfile::tempdir().unwrap();
    let sdk = "/Applications/SDKs/MacOSX.sdk";
    let options = ImporterOptions::new(sdk, "x86_64-apple-macosx10.9")
        .with_framework_search_path("/Library/Frameworks")
        .with_resource_dir(resources.path());
    let mut factory = MockFactory::new(MockForeign::new());

    let importer = Importer::create(
        &options,
        &mut factory,
        MockHost::new(),
        MockDeclImporter::new(),
    )
    .unwrap();
    assert_eq!(importer.target_triple(), "x86_64-apple-macosx10.9");

    let invocation = factory.invocation.unwrap();
    let args = invocation.args();
    assert_eq!(
        &args[..7],
        [
            "-x",
            "objective-c",
            "-fobjc-arc",
            "-fmodules",
            "-fblocks",
            "-fsyntax-only",
            "-w"
        ]
    );
    assert!(args.iter().any(|a| a == sdk));
    let resource_flag = args.iter().position(|a| a == "-resource-dir").unwrap();
    assert_eq!(
        args[resource_flag + 1],
        resources.path().to_string_lossy()
    );
    assert_eq!(invocation.remapped_files()[0].contents, "extern int __ferry;\n");
    assert_eq!(
        importer.subscript_selectors().set_object_at_indexed.num_args(),
        2
    );
}
