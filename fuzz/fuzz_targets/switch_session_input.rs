#![no_main]

use std::io::Cursor;

use boxen_engine::{Context, Session};
use boxen_example_switch::{default_template_root, CLI, MODEL, VENDOR, VERSION};
use boxen_model::{BoxModel, Credential, Port};
use boxen_render::TemplateStore;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut model = BoxModel::new(VENDOR, MODEL, VERSION, "fuzz-box");
    model.credentials.push(Credential::password("admin", "secret"));
    model.credentials.push(Credential::password("enable", "enablepass"));
    model.ports.push(Port::new("eth0"));

    let renderer = TemplateStore::from_dir(default_template_root());
    let mut input = Cursor::new(data.to_vec());
    let mut output = Vec::new();
    let mut context = Context::new();
    let mut session = Session::new(&mut model, &renderer, &mut input, &mut output);
    assert!((CLI.run)(&mut session, &mut context).is_ok());
});
