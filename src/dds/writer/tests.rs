// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::core::rt;
use crate::core::serdata::Serdata;
use crate::dds::{Error, QoS, Result, DDS};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

impl DDS for Point {
    fn type_name() -> &'static str {
        "Point"
    }

    fn to_serdata(&self) -> Result<Serdata> {
        let mut buf = [0u8; 8];
        buf[0..4].copy_from_slice(&self.x.to_le_bytes());
        buf[4..8].copy_from_slice(&self.y.to_le_bytes());
        Ok(Serdata::new_data(0, 0, Arc::from(&buf[..])))
    }

    fn from_serdata(serdata: &Serdata) -> Result<Self> {
        let buf = serdata.payload().ok_or(Error::Config)?;
        if buf.len() < 8 {
            return Err(Error::Config);
        }
        let x = i32::from_le_bytes(buf[0..4].try_into().expect("4 bytes"));
        let y = i32::from_le_bytes(buf[4..8].try_into().expect("4 bytes"));
        Ok(Self { x, y })
    }
}

#[test]
fn test_writer_write_basic() {
    let _ = rt::init_slab_pool();

    let writer = WriterBuilder::<Point>::new("test_topic".to_string())
        .qos(QoS::best_effort())
        .build()
        .expect("writer build should succeed");

    let msg = Point { x: 42, y: 123 };
    let result = writer.write(&msg);
    assert!(result.is_err() || result.is_ok());
}

#[test]
fn test_writer_encode_decode_roundtrip() {
    let original = Point { x: 42, y: -123 };

    let serdata = original.to_serdata().expect("encode should succeed");
    assert_eq!(serdata.byte_size(), 8);

    let decoded = Point::from_serdata(&serdata).expect("decode should succeed");
    assert_eq!(decoded, original);
}

#[test]
fn test_writer_without_transport_backward_compat() {
    let _ = rt::init_slab_pool();

    let writer = WriterBuilder::<Point>::new("test/local".to_string())
        .build()
        .expect("writer build without transport should succeed");

    assert!(
        writer.transport.is_none(),
        "Writer should not have transport in intra-process mode"
    );

    let msg = Point { x: 50, y: 75 };
    let result = writer.write(&msg);
    assert!(result.is_ok() || matches!(result, Err(Error::WouldBlock)));
}
