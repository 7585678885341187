//! Shared schema documents and report files for the integration tests.

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

/// The allowed-value document: record-type codes and a use-type
/// enumeration with a union type over it.
pub const ENUMS_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:avs="http://ddex.net/xml/avs/avs"
           targetNamespace="http://ddex.net/xml/avs/avs">
  <xs:simpleType name="RecordType">
    <xs:restriction base="xs:string">
      <xs:enumeration value="HEAD"/>
      <xs:enumeration value="FOOT"/>
      <xs:enumeration value="SY02"/>
      <xs:enumeration value="AS01"/>
      <xs:enumeration value="AS02"/>
      <xs:enumeration value="MW01"/>
      <xs:enumeration value="RU01"/>
      <xs:enumeration value="SU03"/>
      <xs:enumeration value="LI01"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:simpleType name="DownloadUseType">
    <xs:restriction base="xs:string">
      <xs:enumeration value="Download"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:simpleType name="StreamUseType">
    <xs:restriction base="xs:string">
      <xs:enumeration value="Stream"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:simpleType name="UseType">
    <xs:union memberTypes="avs:DownloadUseType avs:StreamUseType"/>
  </xs:simpleType>
</xs:schema>"#;

/// The row/profile document: row layouts plus the BasicAudio profile's
/// content model.
pub const ROWS_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:dsrf="http://ddex.net/xml/dsrf/dsrf"
           xmlns:avs="http://ddex.net/xml/avs/avs"
           targetNamespace="http://ddex.net/xml/dsrf/dsrf">
  <xs:import namespace="http://ddex.net/xml/avs/avs" schemaLocation="avs.xsd"/>
  <xs:simpleType name="Territory">
    <xs:restriction base="xs:string">
      <xs:pattern value="[A-Z]{2}"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:complexType name="RecordType-HEAD">
    <xs:sequence>
      <xs:element name="RecordType" type="avs:RecordType"/>
      <xs:element name="Version" type="xs:string"/>
      <xs:element name="Profile" type="xs:string"/>
      <xs:element name="ProfileVersion" type="xs:string"/>
      <xs:element name="SenderName" type="xs:string" minOccurs="0"/>
      <xs:element name="CreatedOn" type="xs:dateTime" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="RecordType-SY02">
    <xs:sequence>
      <xs:element name="RecordType" type="avs:RecordType"/>
      <xs:element name="TotalRecords" type="xs:integer" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="RecordType-FOOT">
    <xs:sequence>
      <xs:element name="RecordType" type="avs:RecordType"/>
      <xs:element name="LineCount" type="xs:integer" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="RecordType-AS01">
    <xs:sequence>
      <xs:element name="RecordType" type="avs:RecordType"/>
      <xs:element name="BlockId" type="xs:integer"/>
      <xs:element name="Title" type="xs:string"/>
      <xs:element name="Territory" type="dsrf:Territory" minOccurs="0"/>
      <xs:element name="UseTypes" type="avs:UseType" minOccurs="0" maxOccurs="unbounded"/>
      <xs:element name="Price" type="xs:decimal" minOccurs="0"/>
      <xs:element name="Active" type="xs:boolean" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="RecordType-AS02">
    <xs:sequence>
      <xs:element name="RecordType" type="avs:RecordType"/>
      <xs:element name="BlockId" type="xs:integer"/>
      <xs:element name="Title" type="xs:string" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="RecordType-MW01">
    <xs:sequence>
      <xs:element name="RecordType" type="avs:RecordType"/>
      <xs:element name="BlockId" type="xs:integer"/>
      <xs:element name="WorkTitle" type="xs:string" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="RecordType-RU01">
    <xs:sequence>
      <xs:element name="RecordType" type="avs:RecordType"/>
      <xs:element name="BlockId" type="xs:integer"/>
      <xs:element name="Usages" type="xs:integer" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="RecordType-SU03">
    <xs:sequence>
      <xs:element name="RecordType" type="avs:RecordType"/>
      <xs:element name="BlockId" type="xs:integer"/>
      <xs:element name="Revenue" type="xs:decimal" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="RecordType-LI01">
    <xs:sequence>
      <xs:element name="RecordType" type="avs:RecordType"/>
      <xs:element name="BlockId" type="xs:integer"/>
      <xs:element name="LineValue" type="xs:integer" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="ReleaseGroup">
    <xs:sequence>
      <xs:element name="Release" type="dsrf:RecordType-AS01"/>
      <xs:element name="Work" type="dsrf:RecordType-MW01" minOccurs="0" maxOccurs="unbounded"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="BasicAudioProfile">
    <xs:sequence/>
  </xs:complexType>
  <xs:complexType name="BasicAudioProfileBlock">
    <xs:sequence>
      <xs:choice maxOccurs="unbounded">
        <xs:element name="Releases" type="dsrf:ReleaseGroup"/>
        <xs:element name="AltRelease" type="dsrf:RecordType-AS02"/>
      </xs:choice>
      <xs:choice minOccurs="0" maxOccurs="unbounded">
        <xs:element name="Usage" type="dsrf:RecordType-RU01"/>
      </xs:choice>
      <xs:sequence minOccurs="0" maxOccurs="unbounded">
        <xs:element name="Summary" type="dsrf:RecordType-SU03"/>
        <xs:element name="Line" type="dsrf:RecordType-LI01" minOccurs="0" maxOccurs="unbounded"/>
      </xs:sequence>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#;

/// A well-formed two-block report file.
pub const REPORT_TSV: &str = "\
HEAD\t1.2\tBasicAudioProfile\t1.1\tAcme\t2015-02-03T10:15:00Z\n\
SY02\t6\n\
AS01\t1\tFirst Song\tDE\tDownload|Stream\t9.99\ttrue\n\
MW01\t1\tFirst Work\n\
RU01\t1\t42\n\
SU03\t1\t12.50\n\
LI01\t1\t7\n\
AS02\t2\tSecond Song\n\
FOOT\t8\n";

/// A fixture report directory: both schema documents plus any report
/// files handed in as (name, content) pairs.
pub struct Fixture {
    pub dir: TempDir,
    pub schema_path: PathBuf,
    pub enums_path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let schema_path = write(&dir, "rows.xsd", ROWS_XSD);
        let enums_path = write(&dir, "avs.xsd", ENUMS_XSD);
        Self { dir, schema_path, enums_path }
    }

    pub fn write_report(&self, name: &str, content: &str) -> PathBuf {
        write(&self.dir, name, content)
    }
}

pub fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::File::create(&path).unwrap().write_all(content.as_bytes()).unwrap();
    path
}
